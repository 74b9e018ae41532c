// Logging setup: colored console plus a plain log file
//
// Nothing here installs a global subscriber. `init_logging` hands back a
// `Logging` handle and whoever needs to log is given a clone of it.

use std::sync::Arc;

use anyhow::Result;
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use super::config::LogConfig;

const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Handle to a configured subscriber
///
/// Cloning is cheap. The file writer is flushed once the last clone drops.
#[derive(Clone)]
pub struct Logging {
    dispatch: Dispatch,
    _guard: Option<Arc<WorkerGuard>>,
}

impl Logging {
    /// Handle that discards every event
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
            _guard: None,
        }
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

impl std::fmt::Debug for Logging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logging")
            .field("file", &self._guard.is_some())
            .finish()
    }
}

/// Build the console + file subscriber described by `config`
pub fn init_logging(config: &LogConfig) -> Result<Logging> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&config.file_name)
        .build(&config.dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let console = fmt::layer()
        .with_ansi(true)
        .with_timer(ChronoUtc::new(LOG_TIME_FORMAT.to_string()))
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stdout);

    let file = fmt::layer()
        .with_ansi(false)
        .with_timer(ChronoUtc::new(LOG_TIME_FORMAT.to_string()))
        .with_file(true)
        .with_line_number(true)
        .with_writer(file_writer);

    let subscriber = Registry::default()
        .with(EnvFilter::try_new(&config.filter)?)
        .with(console)
        .with(file);

    Ok(Logging {
        dispatch: Dispatch::new(subscriber),
        _guard: Some(Arc::new(guard)),
    })
}
