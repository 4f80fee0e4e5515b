use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to a daily log file so the terminal UI stays clean.
///
/// `RUST_LOG` wins over `verbose`. Returns the appender guard, which must live
/// until exit so buffered lines are flushed; `None` when no data dir exists.
pub fn init(verbose: bool) -> Result<Option<WorkerGuard>> {
  let Some(proj_dirs) = ProjectDirs::from("", "", "ytmix") else { return Ok(None) };
  let log_dir = proj_dirs.data_local_dir().join("logs");
  std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

  let default_level = if verbose { "ytmix=debug" } else { "ytmix=info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, "ytmix.log"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

  Ok(Some(guard))
}
