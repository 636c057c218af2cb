//! Subscriber setup for the binary

use std::io;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{data_dir, log_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    pub level: Level,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Also write to [`log_path`]
    pub file: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            file: false,
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `options.level`. Logs go to stderr so stdout stays
/// free for command output. The returned guard flushes the log file and
/// must be held until exit. Fails if a global subscriber is already set.
pub fn init_logging(options: LogOptions) -> io::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.level.as_str()));

    let stderr_layer = if options.json {
        fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
            .json()
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
            .boxed()
    };

    let (file_layer, guard) = if options.file {
        std::fs::create_dir_all(data_dir())?;
        let file_name = log_path()
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "cap-version.log".into());
        let appender = tracing_appender::rolling::never(data_dir(), file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .json()
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(guard)
}
