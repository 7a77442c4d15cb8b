use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_DIR: &str = "logs";
pub const LOG_FILE: &str = "flight-checker.log";

// HTTP client internals stay quiet unless RUST_LOG asks for them.
const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

/// Sends all tracing output to a daily file under `logs/`. The terminal
/// belongs to the menu and prompts, so nothing is logged to stdout or
/// stderr. Keep the guard alive until exit or buffered lines are lost.
pub fn initialize_logging() -> WorkerGuard {
    let _ = std::fs::create_dir_all(LOG_DIR);

    let file_appender = tracing_appender::rolling::daily(LOG_DIR, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    tracing::info!("flight-checker {} starting", env!("CARGO_PKG_VERSION"));
    guard
}
