//! Subscriber setup: stderr always, plus an optional rolling file.
use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// File name prefix; the daily roller appends `.YYYY-MM-DD`.
const LOG_FILE_PREFIX: &str = "botctl.log";

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the program.
pub fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        tracing::info!("Log files: {} (rotated daily)", log_file_pattern(dir));
    }
    Ok(guard)
}

/// Path pattern of the files written by the daily roller.
fn log_file_pattern(dir: &Path) -> String {
    format!("{}.YYYY-MM-DD", dir.join(LOG_FILE_PREFIX).display())
}
