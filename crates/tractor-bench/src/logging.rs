use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

const TELEMETRY_FILE: &str = "telemetry.jsonl";

/// Keeps the background writer alive; dropping it flushes the log.
pub struct TelemetryGuard {
    _worker: WorkerGuard,
    pub path: PathBuf,
}

/// Installs the JSON subscriber writing [`TELEMETRY_FILE`] beside the
/// summary. `None` when structured logging is disabled.
pub fn init_logging(
    config: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> anyhow::Result<Option<TelemetryGuard>> {
    if !config.enable_structured {
        return Ok(None);
    }
    if config.decision_details {
        // Read by the analyzer when the runner builds its settings.
        unsafe {
            std::env::set_var("TRACTOR_LOG_DECISIONS", "1");
        }
    }

    let path = telemetry_path(outputs);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating telemetry directory {}", dir.display()))?;
    }
    let file = fs::File::create(&path)
        .with_context(|| format!("creating telemetry log {}", path.display()))?;
    let (writer, worker) = NonBlockingBuilder::default().lossy(false).finish(file);

    let default_level = config.level().unwrap_or(Level::INFO);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));
    let subscriber = fmt::Subscriber::builder()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // Tests may have installed a subscriber already.
    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(Some(TelemetryGuard {
        _worker: worker,
        path,
    }))
}

/// Where the telemetry log lands: the summary's directory, or the working
/// directory when the summary path has none.
pub fn telemetry_path(outputs: &ResolvedOutputs) -> PathBuf {
    let dir = outputs
        .summary_md
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    dir.join(TELEMETRY_FILE)
}
