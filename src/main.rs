// src/main.rs

use dojowatch::logging::LogTarget;
use dojowatch::types::UiMode;
use dojowatch::{cli, config, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // Config first: the UI mode decides where logs may go.
    let cfg = match config::load_and_validate(&args) {
        Ok(cfg) => cfg,
        Err(err) => exit_with(err),
    };

    let target = match (&args.log_file, cfg.ui()) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, UiMode::Tui) => LogTarget::Discard,
        (None, UiMode::Console) => LogTarget::Stderr,
    };
    if let Err(err) = logging::init_logging(args.log_level, target) {
        eprintln!("dojowatch error: {err:?}");
        std::process::exit(1);
    }

    if let Err(err) = run(args, cfg).await {
        exit_with(err);
    }
}

fn exit_with(err: dojowatch::errors::DojoError) -> ! {
    eprintln!("dojowatch error: {err}");
    std::process::exit(err.exit_code());
}
