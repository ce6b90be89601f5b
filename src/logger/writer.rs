//! Log writer module
//!
//! Installs the global `tracing` subscriber. Application events go to stderr
//! or the error log file; access log lines go to stdout or the access log file.
//! Both outputs use non-blocking writers so request tasks never wait on I/O.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{filter_fn, EnvFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use super::ACCESS_TARGET;
use crate::config::LoggingConfig;
use crate::error::BoxError;

/// Keeps the background writers alive; drop only when the process exits
#[must_use = "logs are lost once the guards are dropped"]
pub struct LogGuards {
    _access: WorkerGuard,
    _error: WorkerGuard,
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup. `RUST_LOG` overrides
/// `logging.level` when set.
pub fn init(config: &LoggingConfig) -> Result<LogGuards, BoxError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };
    // Access lines have their own layer
    let filter = filter.add_directive(format!("{ACCESS_TARGET}=off").parse()?);

    let (error_writer, error_guard) = open_writer(config.error_log_file.as_deref(), Output::Stderr)?;
    let (access_writer, access_guard) =
        open_writer(config.access_log_file.as_deref(), Output::Stdout)?;

    let app_layer = fmt::layer()
        .with_writer(error_writer)
        .with_ansi(config.error_log_file.is_none())
        .with_filter(filter);

    let access_layer = fmt::layer()
        .with_writer(access_writer)
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_filter(filter_fn(|meta| meta.target() == ACCESS_TARGET));

    tracing_subscriber::registry()
        .with(app_layer)
        .with(access_layer)
        .try_init()?;

    Ok(LogGuards {
        _access: access_guard,
        _error: error_guard,
    })
}

enum Output {
    Stdout,
    Stderr,
}

fn open_writer(path: Option<&str>, fallback: Output) -> io::Result<(NonBlocking, WorkerGuard)> {
    Ok(match (path, fallback) {
        (Some(path), _) => tracing_appender::non_blocking(open_log_file(path)?),
        (None, Output::Stdout) => tracing_appender::non_blocking(io::stdout()),
        (None, Output::Stderr) => tracing_appender::non_blocking(io::stderr()),
    })
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}
