use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize file logging.
///
/// The terminal is owned by the TUI, so logs go to a daily-rotated file
/// under the user's data directory. Returns the guard that flushes the
/// writer on drop; keep it alive for the whole session.
pub fn init() -> Result<WorkerGuard> {
  let dir = log_dir()?;
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(&dir, "b9s.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("b9s=info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}

fn log_dir() -> Result<PathBuf> {
  dirs::data_dir()
    .map(|d| d.join("b9s").join("logs"))
    .ok_or_else(|| eyre!("could not determine data directory"))
}
