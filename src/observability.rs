//! Logging setup and in-process counters

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use thiserror::Error;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::{self, DefaultFields, FormatEvent, FormatFields};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::downloader::DownloadResult;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Failed to open log file: {0}")]
    LogFile(#[from] InitError),

    #[error("Invalid log file path: {0}")]
    LogPath(String),

    #[error("Failed to install subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the file writer flushing; hold it until the process exits
#[must_use]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber: console and file are independent layers
/// sharing one filter. `RUST_LOG` overrides `config.filter`.
pub fn init_tracing(config: &LoggingConfig) -> Result<LogGuard, ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let console = config.console.then(|| line_layer(std::io::stdout));

    let log_file = config.file.as_deref().filter(|p| !p.as_os_str().is_empty());
    let (file, guard) = match log_file {
        Some(path) => {
            let appender = file_appender(path)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = line_layer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;

    Ok(LogGuard { _file: guard })
}

/// `fmt` layer writing [`LineFormat`] lines to `writer`
pub fn line_layer<S, W>(writer: W) -> fmt::Layer<S, DefaultFields, LineFormat, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer()
        .with_ansi(false)
        .event_format(LineFormat)
        .with_writer(writer)
}

/// `<timestamp> - <LEVEL> - <message> <fields>`, one event per line
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        SystemTime.format_time(&mut writer)?;
        write!(writer, " - {} - ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Append-only, never-rotated file at exactly `path`
fn file_appender(path: &Path) -> Result<RollingFileAppender, ObservabilityError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ObservabilityError::LogPath(path.display().to_string()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    Ok(RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)?)
}

/// Process-lifetime counters, exposed on the health endpoint
#[derive(Debug, Default)]
pub struct Metrics {
    batches_accepted: AtomicU64,
    batches_rejected: AtomicU64,
    downloads_succeeded: AtomicU64,
    downloads_failed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_rejected(&self) {
        self.batches_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "batches_rejected", "Metric incremented");
    }

    pub fn batch_completed(&self, results: &[DownloadResult]) {
        let succeeded = results.iter().filter(|r| r.is_success()).count() as u64;
        let failed = results.len() as u64 - succeeded;

        self.batches_accepted.fetch_add(1, Ordering::Relaxed);
        self.downloads_succeeded.fetch_add(succeeded, Ordering::Relaxed);
        self.downloads_failed.fetch_add(failed, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_accepted: self.batches_accepted.load(Ordering::Relaxed),
            batches_rejected: self.batches_rejected.load(Ordering::Relaxed),
            downloads_succeeded: self.downloads_succeeded.load(Ordering::Relaxed),
            downloads_failed: self.downloads_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub batches_accepted: u64,
    pub batches_rejected: u64,
    pub downloads_succeeded: u64,
    pub downloads_failed: u64,
}
