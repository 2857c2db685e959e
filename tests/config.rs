// tests/config.rs

use std::error::Error;
use std::fs;
use std::time::Duration;

use clap::Parser;
use tempfile::tempdir;

use dojowatch::cli::CliArgs;
use dojowatch::config::{load_and_validate, load_from_path, resolve, Action, Overrides, RawConfigFile};
use dojowatch::errors::DojoError;
use dojowatch::types::UiMode;

type TestResult = Result<(), Box<dyn Error>>;

fn raw(toml_text: &str) -> RawConfigFile {
    toml::from_str(toml_text).expect("valid test TOML")
}

#[test]
fn defaults_without_file_or_flags() -> TestResult {
    let dir = tempdir()?;
    let cfg = resolve(
        RawConfigFile::default(),
        None,
        Overrides {
            directory: Some(dir.path().to_path_buf()),
            ..Overrides::default()
        },
    )?;

    assert_eq!(cfg.root(), dir.path().canonicalize()?);
    assert_eq!(cfg.poll_interval(), Duration::from_secs(1));
    assert_eq!(cfg.round_time(), Duration::from_secs(300));
    assert_eq!(cfg.ui(), UiMode::Console);
    assert_eq!(UiMode::default(), UiMode::Console);
    assert!(cfg.patterns().is_empty());
    assert_eq!(cfg.actions(), &[Action::CommitAll]);
    assert!(cfg.commits());
    Ok(())
}

#[test]
fn commit_runs_before_commands_in_given_order() -> TestResult {
    let dir = tempdir()?;
    let cfg = resolve(
        RawConfigFile::default(),
        None,
        Overrides {
            directory: Some(dir.path().to_path_buf()),
            commands: vec!["clear".into(), "cargo test".into()],
            ..Overrides::default()
        },
    )?;

    let labels: Vec<&str> = cfg.actions().iter().map(Action::label).collect();
    assert_eq!(labels, vec!["git commit", "clear", "cargo test"]);
    Ok(())
}

#[test]
fn no_commit_drops_the_commit_action() -> TestResult {
    let dir = tempdir()?;
    let cfg = resolve(
        RawConfigFile::default(),
        None,
        Overrides {
            directory: Some(dir.path().to_path_buf()),
            commands: vec!["make".into()],
            no_commit: true,
            ..Overrides::default()
        },
    )?;

    assert_eq!(cfg.actions(), &[Action::Shell("make".into())]);
    assert!(!cfg.commits());
    Ok(())
}

#[test]
fn file_commit_false_is_respected() -> TestResult {
    let dir = tempdir()?;
    let file = raw("[watch]\ncommit = false\ncommands = [\"make\"]\n");
    let cfg = resolve(
        file,
        None,
        Overrides {
            directory: Some(dir.path().to_path_buf()),
            ..Overrides::default()
        },
    )?;
    assert!(!cfg.commits());
    Ok(())
}

#[test]
fn cli_scalars_win_and_lists_append() -> TestResult {
    let dir = tempdir()?;
    let file = raw(
        r#"
        [watch]
        commands = ["from-file"]
        patterns = [".swp"]
        poll_interval_secs = 5
        round_time_secs = 600
        ui = "tui"
        "#,
    );
    let cfg = resolve(
        file,
        None,
        Overrides {
            directory: Some(dir.path().to_path_buf()),
            commands: vec!["from-cli".into()],
            patterns: vec!["~".into()],
            poll_interval_secs: Some(2),
            ui: Some(UiMode::Console),
            ..Overrides::default()
        },
    )?;

    assert_eq!(cfg.poll_interval(), Duration::from_secs(2));
    assert_eq!(cfg.round_time(), Duration::from_secs(600));
    assert_eq!(cfg.ui(), UiMode::Console);
    assert_eq!(cfg.patterns(), &[".swp".to_string(), "~".to_string()]);
    let labels: Vec<&str> = cfg.actions().iter().map(Action::label).collect();
    assert_eq!(labels, vec!["git commit", "from-file", "from-cli"]);
    Ok(())
}

#[test]
fn zero_intervals_are_rejected() -> TestResult {
    let dir = tempdir()?;
    for overrides in [
        Overrides {
            poll_interval_secs: Some(0),
            ..Overrides::default()
        },
        Overrides {
            round_time_secs: Some(0),
            ..Overrides::default()
        },
    ] {
        let err = resolve(
            RawConfigFile::default(),
            None,
            Overrides {
                directory: Some(dir.path().to_path_buf()),
                ..overrides
            },
        )
        .unwrap_err();
        assert!(matches!(err, DojoError::Config(_)), "got {err:?}");
        assert_eq!(err.exit_code(), 2);
    }
    Ok(())
}

#[test]
fn missing_or_non_directory_root_is_rejected() -> TestResult {
    let dir = tempdir()?;
    let file = dir.path().join("plain.txt");
    fs::write(&file, "x")?;

    for candidate in [dir.path().join("missing"), file] {
        let err = resolve(
            RawConfigFile::default(),
            None,
            Overrides {
                directory: Some(candidate),
                ..Overrides::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DojoError::Config(_)), "got {err:?}");
    }
    Ok(())
}

#[test]
fn terminal_ui_needs_a_command() -> TestResult {
    let dir = tempdir()?;
    let base = Overrides {
        directory: Some(dir.path().to_path_buf()),
        ui: Some(UiMode::Tui),
        ..Overrides::default()
    };

    let err = resolve(RawConfigFile::default(), None, base.clone()).unwrap_err();
    assert!(matches!(err, DojoError::Config(ref msg) if msg.contains("COMMAND")));

    let cfg = resolve(
        RawConfigFile::default(),
        None,
        Overrides {
            commands: vec!["pytest".into()],
            ..base
        },
    )?;
    assert_eq!(cfg.ui(), UiMode::Tui);
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() {
    let err = toml::from_str::<RawConfigFile>("[watch]\ncomands = [\"typo\"]\n").unwrap_err();
    assert!(err.to_string().contains("comands"));

    assert!(toml::from_str::<RawConfigFile>("[other]\nx = 1\n").is_err());
}

#[test]
fn load_from_path_parses_toml_file() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("dojo.toml");
    fs::write(
        &path,
        "[watch]\ncommands = [\"clear\", \"pytest\"]\npatterns = [\".pyc\"]\n",
    )?;

    let raw = load_from_path(&path)?;
    assert_eq!(raw.watch.commands, vec!["clear", "pytest"]);
    assert_eq!(raw.watch.patterns, vec![".pyc"]);
    assert!(raw.watch.directory.is_none());
    Ok(())
}

#[test]
fn load_from_path_reports_io_and_toml_errors() -> TestResult {
    let dir = tempdir()?;
    let err = load_from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, DojoError::Io(_)), "got {err:?}");

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[watch\n")?;
    let err = load_from_path(&bad).unwrap_err();
    assert!(matches!(err, DojoError::Toml(_)), "got {err:?}");
    assert_eq!(err.exit_code(), 2);
    Ok(())
}

#[test]
fn relative_directory_in_file_resolves_next_to_the_file() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("kata"))?;
    let path = dir.path().join("dojo.toml");
    fs::write(&path, "[watch]\ndirectory = \"kata\"\n")?;

    let args = CliArgs::try_parse_from([
        "dojowatch",
        "--config",
        path.to_str().ok_or("non-utf8 temp path")?,
    ])?;
    let cfg = load_and_validate(&args)?;

    assert_eq!(cfg.root(), dir.path().join("kata").canonicalize()?);
    Ok(())
}

#[test]
fn cli_flags_and_positional_commands() -> TestResult {
    let args = CliArgs::try_parse_from([
        "dojowatch", "-d", "/tmp", "-c", "clear", "-p", ".swp", "-p", "~", "--no-commit",
        "-r", "420", "cargo", "test",
    ])?;

    assert_eq!(args.directory.as_deref(), Some(std::path::Path::new("/tmp")));
    assert_eq!(args.patterns, vec![".swp", "~"]);
    assert!(args.no_commit);
    assert_eq!(args.round_time, Some(420));
    assert_eq!(args.all_commands(), vec!["clear", "cargo", "test"]);
    Ok(())
}

#[test]
fn options_after_positional_commands_are_still_options() -> TestResult {
    let args = CliArgs::try_parse_from(["dojowatch", "make test", "-p", ".swp"])?;
    assert_eq!(args.all_commands(), vec!["make test"]);
    assert_eq!(args.patterns, vec![".swp"]);

    let args = CliArgs::try_parse_from([
        "dojowatch", "clear", "--no-commit", "-p", "~", "make test", "-c", "echo done",
    ])?;
    assert_eq!(args.all_commands(), vec!["echo done", "clear", "make test"]);
    assert_eq!(args.patterns, vec!["~"]);
    assert!(args.no_commit);
    Ok(())
}

#[test]
fn cli_defaults_leave_scalars_unset() -> TestResult {
    let args = CliArgs::try_parse_from(["dojowatch"])?;
    assert!(args.directory.is_none());
    assert!(args.round_time.is_none());
    assert!(args.interval.is_none());
    assert!(args.ui.is_none());
    assert!(!args.dry_run);
    assert!(args.all_commands().is_empty());
    Ok(())
}

#[test]
fn cli_ui_mode_values() -> TestResult {
    let args = CliArgs::try_parse_from(["dojowatch", "--ui", "tui", "pytest"])?;
    assert_eq!(args.ui, Some(UiMode::Tui));
    assert!(CliArgs::try_parse_from(["dojowatch", "--ui", "gtk"]).is_err());
    Ok(())
}
