use crate::model::AppConfig;
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Route tracing to a file; the terminal belongs to the UI.
/// Keep the returned guard alive for the life of the program.
pub fn init_logging(cfg: &AppConfig) -> Result<WorkerGuard> {
    let path = cfg.log_path();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path has no file name: {path:?}"))?;
    std::fs::create_dir_all(&dir).with_context(|| format!("creating log dir {dir:?}"))?;
    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(guard)
}
