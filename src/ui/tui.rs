// src/ui/tui.rs

//! Interactive terminal front-end (ratatui + crossterm).
//!
//! The engine never touches widgets: [`TuiSink`] turns every sink call into
//! a [`UiEvent`] message, and a dedicated thread owns the terminal, folds
//! the messages into [`TuiState`] and redraws.

use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::engine::shutdown::{ShutdownSignal, ShutdownTrigger};
use crate::engine::timer::TimerCommand;
use crate::errors::{DojoError, Result};
use crate::exec::CommandResult;
use crate::ui::PresentationSink;

/// Messages from the engine to the terminal thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Startup {
        directory: PathBuf,
        patterns: Vec<String>,
    },
    ActionStarted(String),
    ActionFinished {
        label: String,
        exit_status: i32,
        output: String,
    },
    ActionFailed {
        label: String,
        message: String,
    },
    Countdown(u64),
    Farewell,
}

/// Sink half: forwards every call as a message.
#[derive(Debug)]
pub struct TuiSink {
    tx: Sender<UiEvent>,
}

impl TuiSink {
    pub fn new(tx: Sender<UiEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: UiEvent) {
        // The terminal thread may already be gone during shutdown.
        let _ = self.tx.send(event);
    }
}

impl PresentationSink for TuiSink {
    fn show_startup_info(&self, directory: &Path, patterns: &[String]) {
        self.send(UiEvent::Startup {
            directory: directory.to_path_buf(),
            patterns: patterns.to_vec(),
        });
    }

    fn show_action_started(&self, label: &str) {
        self.send(UiEvent::ActionStarted(label.to_string()));
    }

    fn show_result(&self, label: &str, result: &CommandResult) {
        self.send(UiEvent::ActionFinished {
            label: label.to_string(),
            exit_status: result.exit_status,
            output: sanitize_output(&result.output_lossy()),
        });
    }

    fn show_error(&self, label: &str, message: &str) {
        self.send(UiEvent::ActionFailed {
            label: label.to_string(),
            message: message.to_string(),
        });
    }

    fn show_countdown(&self, remaining: u64) {
        self.send(UiEvent::Countdown(remaining));
    }

    fn show_farewell(&self) {
        self.send(UiEvent::Farewell);
    }
}

/// Drop control characters (escape sequences from `clear` and friends)
/// that would corrupt the frame; keep newlines and tabs.
pub fn sanitize_output(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Running,
    Exited(i32),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRow {
    pub label: String,
    pub status: ActionStatus,
}

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Timer(TimerCommand),
}

/// Everything the terminal shows, independent of any terminal.
#[derive(Debug, Clone)]
pub struct TuiState {
    pub directory: Option<PathBuf>,
    pub patterns: Vec<String>,
    pub round_time: u64,
    pub remaining: u64,
    pub timer_running: bool,
    /// Latest status per action, in first-seen order.
    pub rows: Vec<ActionRow>,
    pub last_label: Option<String>,
    pub last_output: String,
    pub quit: bool,
}

impl TuiState {
    pub fn new(round_time: u64) -> Self {
        Self {
            directory: None,
            patterns: Vec::new(),
            round_time,
            remaining: round_time,
            timer_running: false,
            rows: Vec::new(),
            last_label: None,
            last_output: String::new(),
            quit: false,
        }
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Startup {
                directory,
                patterns,
            } => {
                self.directory = Some(directory);
                self.patterns = patterns;
            }
            UiEvent::ActionStarted(label) => self.set_status(label, ActionStatus::Running),
            UiEvent::ActionFinished {
                label,
                exit_status,
                output,
            } => {
                self.last_label = Some(label.clone());
                self.last_output = output;
                self.set_status(label, ActionStatus::Exited(exit_status));
            }
            UiEvent::ActionFailed { label, message } => {
                self.last_label = Some(label.clone());
                self.last_output = message.clone();
                self.set_status(label, ActionStatus::Failed(message));
            }
            UiEvent::Countdown(remaining) => self.remaining = remaining,
            UiEvent::Farewell => self.quit = true,
        }
    }

    fn set_status(&mut self, label: String, status: ActionStatus) {
        match self.rows.iter_mut().find(|r| r.label == label) {
            Some(row) => row.status = status,
            None => self.rows.push(ActionRow { label, status }),
        }
    }

    /// Map a key press to an action, updating local view state.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<KeyAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit = true;
                Some(KeyAction::Quit)
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
                Some(KeyAction::Quit)
            }
            KeyCode::Char(' ') => {
                self.timer_running = !self.timer_running;
                Some(KeyAction::Timer(TimerCommand::Toggle))
            }
            KeyCode::Char('r') => Some(KeyAction::Timer(TimerCommand::Reset)),
            _ => None,
        }
    }

    pub fn countdown_label(&self) -> String {
        let state = if self.timer_running { "running" } else { "paused" };
        format!(
            "{:02}:{:02} ({state})",
            self.remaining / 60,
            self.remaining % 60
        )
    }
}

/// Draw the whole screen for `state`.
pub fn render(f: &mut Frame, state: &TuiState) {
    let rows_height = (state.rows.len() as u16).max(1) + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),           // Header
            Constraint::Length(3),           // Round timer
            Constraint::Length(rows_height), // Actions
            Constraint::Min(3),              // Last output
        ])
        .split(f.area());

    render_header(f, chunks[0], state);
    render_timer(f, chunks[1], state);
    render_actions(f, chunks[2], state);
    render_output(f, chunks[3], state);
}

fn render_header(f: &mut Frame, area: Rect, state: &TuiState) {
    let dir = state
        .directory
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "...".to_string());
    let patterns = if state.patterns.is_empty() {
        "(none)".to_string()
    } else {
        state.patterns.join(" ")
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Watching ", Style::default().fg(Color::Gray)),
            Span::styled(dir, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Ignoring ", Style::default().fg(Color::Gray)),
            Span::raw(patterns),
        ]),
    ];

    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" dojowatch (space: timer, r: reset, q: quit) "),
    );
    f.render_widget(header, area);
}

fn render_timer(f: &mut Frame, area: Rect, state: &TuiState) {
    let ratio = if state.round_time == 0 {
        0.0
    } else {
        (state.remaining as f64 / state.round_time as f64).clamp(0.0, 1.0)
    };
    let color = if state.remaining == 0 {
        Color::Red
    } else if state.timer_running {
        Color::Green
    } else {
        Color::Yellow
    };
    let label = if state.remaining == 0 {
        "00:00 switch!".to_string()
    } else {
        state.countdown_label()
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Round "))
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(label);
    f.render_widget(gauge, area);
}

fn render_actions(f: &mut Frame, area: Rect, state: &TuiState) {
    let items: Vec<ListItem> = if state.rows.is_empty() {
        vec![ListItem::new(Span::styled(
            "Waiting for the first change...",
            Style::default().fg(Color::Gray),
        ))]
    } else {
        state
            .rows
            .iter()
            .map(|row| {
                let (badge, color) = match &row.status {
                    ActionStatus::Running => ("RUN ".to_string(), Color::Cyan),
                    ActionStatus::Exited(0) => ("OK  ".to_string(), Color::Green),
                    ActionStatus::Exited(code) => (format!("{code:<4}"), Color::Red),
                    ActionStatus::Failed(_) => ("ERR ".to_string(), Color::Magenta),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(badge, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::raw(" "),
                    Span::raw(row.label.clone()),
                ]))
            })
            .collect()
    };

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Actions "));
    f.render_widget(list, area);
}

fn render_output(f: &mut Frame, area: Rect, state: &TuiState) {
    let title = match &state.last_label {
        Some(label) => format!(" Output: {label} "),
        None => " Output ".to_string(),
    };

    // Keep the tail visible: most test runners put the summary last.
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = {
        let all: Vec<&str> = state.last_output.lines().collect();
        let start = all.len().saturating_sub(visible);
        all[start..].iter().map(|l| Line::from(l.to_string())).collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

/// Handle to the terminal thread.
#[derive(Debug)]
pub struct TuiHandle {
    sink: Arc<TuiSink>,
    thread: JoinHandle<io::Result<()>>,
}

impl TuiHandle {
    pub fn sink(&self) -> Arc<TuiSink> {
        Arc::clone(&self.sink)
    }

    /// Wait for the terminal thread to restore the screen and exit.
    pub fn join(self) -> Result<()> {
        match self.thread.join() {
            Ok(res) => res.map_err(DojoError::from),
            Err(_) => Err(DojoError::Other(anyhow::anyhow!("terminal UI thread panicked"))),
        }
    }
}

/// Start the terminal UI on its own thread.
///
/// Quit keys fire `trigger`; the thread itself exits once `signal` is set.
pub fn spawn_tui(
    round_time: u64,
    trigger: ShutdownTrigger,
    signal: ShutdownSignal,
    timer_tx: UnboundedSender<TimerCommand>,
) -> Result<TuiHandle> {
    let (tx, rx) = mpsc::channel::<UiEvent>();
    let thread = thread::Builder::new()
        .name("dojowatch-tui".to_string())
        .spawn(move || {
            let mut terminal = match setup_terminal() {
                Ok(terminal) => terminal,
                Err(err) => {
                    // Nobody would see the results; stop the watcher too.
                    trigger.trigger();
                    return Err(err);
                }
            };
            let res = event_loop(
                &mut terminal,
                TuiState::new(round_time),
                rx,
                &trigger,
                &signal,
                &timer_tx,
            );
            if let Err(err) = restore_terminal(&mut terminal) {
                warn!(error = %err, "failed to restore terminal");
            }
            res
        })?;

    Ok(TuiHandle {
        sink: Arc::new(TuiSink::new(tx)),
        thread,
    })
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    mut state: TuiState,
    rx: Receiver<UiEvent>,
    trigger: &ShutdownTrigger,
    signal: &ShutdownSignal,
    timer_tx: &UnboundedSender<TimerCommand>,
) -> io::Result<()> {
    loop {
        while let Ok(ui_event) = rx.try_recv() {
            state.apply(ui_event);
        }

        terminal.draw(|f| render(f, &state))?;

        if state.quit || signal.is_triggered() {
            debug!("terminal UI exiting");
            trigger.trigger();
            return Ok(());
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match state.handle_key(key) {
                    Some(KeyAction::Quit) => trigger.trigger(),
                    Some(KeyAction::Timer(command)) => {
                        let _ = timer_tx.send(command);
                    }
                    None => {}
                }
            }
        }
    }
}

pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
