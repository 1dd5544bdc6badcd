use anyhow::{Context, Result, anyhow};
use chrono::Local;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy)]
struct CustomTimer;

impl FormatTime for CustomTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%m%dT%H:%M:%S%.3f"))
    }
}

/// Log to stdout and to `log_path`, both filtered by `level`
/// (an `EnvFilter` directive such as `info` or `fairdiv=debug`).
///
/// Keep the returned guard alive until the program exits so the file writer
/// flushes.
pub fn init(log_path: impl AsRef<Path>, level: &str) -> Result<WorkerGuard> {
    let log_path = log_path.as_ref();
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log dir {}", parent.display()))?;
    }
    let file = std::fs::File::create(log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(CustomTimer)
                .with_writer(std::io::stdout)
                .with_filter(EnvFilter::new(level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(CustomTimer)
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(EnvFilter::new(level)),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}
