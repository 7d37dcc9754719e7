use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use stickerboard::cli::commands::Cli;
use stickerboard::cli::handlers;
use stickerboard::io::store;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "STICKERBOARD_LOG";
const TUI_LOG_FILE: &str = "stickerboard.log";

fn main() {
    let cli = Cli::parse();

    if cli.command.is_none() {
        // The TUI owns the terminal, so diagnostics go to a file
        if let Ok(dir) = store::resolve_store_dir(cli.store.as_deref()) {
            init_file_logging(&dir);
        }
    } else {
        init_stderr_logging();
    }

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_file_logging(store_dir: &Path) {
    if std::fs::create_dir_all(store_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(store_dir.join(TUI_LOG_FILE))
    else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
