// tests/presentation.rs

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use dojowatch::engine::TimerCommand;
use dojowatch::exec::CommandResult;
use dojowatch::ui::console::FAREWELL;
use dojowatch::ui::tui::{render, sanitize_output, ActionStatus, KeyAction};
use dojowatch::ui::{ConsoleSink, PresentationSink, TuiSink, TuiState, UiEvent};

type TestResult = Result<(), Box<dyn Error>>;

fn console_text(f: impl FnOnce(&ConsoleSink<Vec<u8>>)) -> String {
    let sink = ConsoleSink::new(Vec::new());
    f(&sink);
    String::from_utf8_lossy(&sink.into_inner()).into_owned()
}

#[test]
fn console_startup_banner_lists_directory_and_patterns() {
    let text = console_text(|s| {
        s.show_startup_info(Path::new("/work/kata"), &[".swp".into(), "~".into()])
    });
    assert_eq!(
        text,
        "Monitoring files in /work/kata\nignoring files with .swp ~ in their name\npress ^C to quit\n"
    );

    let text = console_text(|s| s.show_startup_info(Path::new("/work/kata"), &[]));
    assert!(!text.contains("ignoring"));
}

#[test]
fn console_result_copies_output_then_status_line() {
    let text = console_text(|s| {
        s.show_result("exit 1", &CommandResult::new(1, ""));
        s.show_result("echo done", &CommandResult::new(0, "done\n"));
        s.show_result("printf x", &CommandResult::new(0, "x"));
    });
    assert_eq!(
        text,
        "[exit 1] exit 1\ndone\n[exit 0] echo done\nx\n[exit 0] printf x\n"
    );
}

#[test]
fn console_error_and_farewell() {
    let text = console_text(|s| {
        s.show_countdown(42);
        s.show_error("make", "failed to launch");
        s.show_farewell();
    });
    assert_eq!(text, format!("[error] make: failed to launch\n\n{FAREWELL}\n"));
}

#[test]
fn sanitize_strips_escape_sequences_but_keeps_layout() {
    assert_eq!(sanitize_output("\x1b[H\x1b[2Jok\n\tdone\r\n"), "[H[2Jok\n\tdone\n");
    assert_eq!(sanitize_output("plain"), "plain");
}

#[test]
fn tui_sink_forwards_calls_as_messages() {
    let (tx, rx) = mpsc::channel();
    let sink = TuiSink::new(tx);

    sink.show_startup_info(Path::new("/kata"), &[".pyc".into()]);
    sink.show_action_started("pytest");
    sink.show_result("pytest", &CommandResult::new(1, "\x1b[31mFAILED\x1b[0m\n"));
    sink.show_countdown(299);
    drop(sink);

    let events: Vec<UiEvent> = rx.iter().collect();
    assert_eq!(
        events,
        vec![
            UiEvent::Startup {
                directory: PathBuf::from("/kata"),
                patterns: vec![".pyc".into()],
            },
            UiEvent::ActionStarted("pytest".into()),
            UiEvent::ActionFinished {
                label: "pytest".into(),
                exit_status: 1,
                output: "[31mFAILED[0m\n".into(),
            },
            UiEvent::Countdown(299),
        ]
    );
}

#[test]
fn tui_sink_ignores_a_closed_channel() {
    let (tx, rx) = mpsc::channel();
    drop(rx);
    let sink = TuiSink::new(tx);
    sink.show_farewell();
}

#[test]
fn state_tracks_latest_status_per_action() {
    let mut state = TuiState::new(300);
    state.apply(UiEvent::ActionStarted("git commit".into()));
    state.apply(UiEvent::ActionStarted("pytest".into()));
    state.apply(UiEvent::ActionFinished {
        label: "pytest".into(),
        exit_status: 1,
        output: "1 failed".into(),
    });
    state.apply(UiEvent::ActionFailed {
        label: "git commit".into(),
        message: "not a repository".into(),
    });

    let rows: Vec<(&str, &ActionStatus)> = state.rows.iter().map(|r| (r.label.as_str(), &r.status)).collect();
    assert_eq!(
        rows,
        vec![
            ("git commit", &ActionStatus::Failed("not a repository".into())),
            ("pytest", &ActionStatus::Exited(1)),
        ]
    );
    assert_eq!(state.last_label.as_deref(), Some("git commit"));
    assert_eq!(state.last_output, "not a repository");

    state.apply(UiEvent::ActionStarted("pytest".into()));
    assert_eq!(state.rows.len(), 2);
    assert_eq!(state.rows[1].status, ActionStatus::Running);

    state.apply(UiEvent::Farewell);
    assert!(state.quit);
}

fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

#[test]
fn keys_map_to_timer_commands_and_quit() {
    let mut state = TuiState::new(60);

    assert_eq!(
        state.handle_key(press(KeyCode::Char(' '), KeyModifiers::NONE)),
        Some(KeyAction::Timer(TimerCommand::Toggle))
    );
    assert!(state.timer_running);
    assert_eq!(
        state.handle_key(press(KeyCode::Char('r'), KeyModifiers::NONE)),
        Some(KeyAction::Timer(TimerCommand::Reset))
    );
    assert_eq!(state.handle_key(press(KeyCode::Char('x'), KeyModifiers::NONE)), None);
    assert!(!state.quit);

    assert_eq!(
        state.handle_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        Some(KeyAction::Quit)
    );
    assert!(state.quit);

    let mut state = TuiState::new(60);
    assert_eq!(state.handle_key(press(KeyCode::Esc, KeyModifiers::NONE)), Some(KeyAction::Quit));
}

#[test]
fn key_releases_are_ignored() {
    let mut state = TuiState::new(60);
    let release = KeyEvent {
        code: KeyCode::Char('q'),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    assert_eq!(state.handle_key(release), None);
    assert!(!state.quit);
}

#[test]
fn countdown_label_formats_minutes_and_seconds() {
    let mut state = TuiState::new(300);
    assert_eq!(state.countdown_label(), "05:00 (paused)");
    state.remaining = 61;
    state.timer_running = true;
    assert_eq!(state.countdown_label(), "01:01 (running)");
}

fn screen_text(state: &TuiState) -> Result<String, Box<dyn Error>> {
    let mut terminal = Terminal::new(TestBackend::new(70, 20))?;
    terminal.draw(|f| render(f, state))?;
    let buffer = terminal.backend().buffer();
    Ok(buffer.content().iter().map(|cell| cell.symbol()).collect())
}

#[test]
fn render_shows_directory_actions_and_output_tail() -> TestResult {
    let mut state = TuiState::new(300);
    state.apply(UiEvent::Startup {
        directory: PathBuf::from("/kata"),
        patterns: vec![".swp".into()],
    });
    state.apply(UiEvent::ActionFinished {
        label: "pytest".into(),
        exit_status: 0,
        output: "collected 3 items\n3 passed".into(),
    });

    let text = screen_text(&state)?;
    assert!(text.contains("Watching /kata"));
    assert!(text.contains("Ignoring .swp"));
    assert!(text.contains("OK   pytest"));
    assert!(text.contains("Output: pytest"));
    assert!(text.contains("3 passed"));
    assert!(text.contains("05:00 (paused)"));
    Ok(())
}

#[test]
fn render_before_first_change_and_at_round_end() -> TestResult {
    let mut state = TuiState::new(300);
    let text = screen_text(&state)?;
    assert!(text.contains("Waiting for the first change"));
    assert!(text.contains("(none)"));

    state.apply(UiEvent::Countdown(0));
    let text = screen_text(&state)?;
    assert!(text.contains("switch!"));
    Ok(())
}
