//! Logger module
//!
//! Event helpers on top of `tracing`:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Stream, error and warning logging
//!
//! Access log lines go to the [`ACCESS_TARGET`] target, which the subscriber
//! built in [`writer`] routes to its own output.

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::{init, LogGuards};

use crate::config::Config;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Instant;

/// Target carrying access log lines
pub const ACCESS_TARGET: &str = "access";

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("FLV stream server started");
    tracing::info!(
        "Streaming {} at http://{addr}{}",
        config.stream.file,
        config.stream.route
    );
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(max) = config.performance.max_connections {
        tracing::info!("Max connections: {max}");
    }
    if let Some(ref path) = config.logging.access_log_file {
        tracing::info!("Access log: {path}");
    }
    if let Some(ref path) = config.logging.error_log_file {
        tracing::info!("Error log: {path}");
    }
    tracing::info!("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(%peer_addr, "[Connection] Accepted");
}

/// Connection ended with an error; a peer hang-up is expected for media clients
pub fn log_connection_closed(peer_addr: &SocketAddr, err: &hyper::Error) {
    if err.is_parse() || err.is_parse_too_large() || err.is_timeout() {
        tracing::warn!(%peer_addr, "[Connection] Protocol error: {err}");
    } else {
        tracing::debug!(%peer_addr, "[Connection] Closed: {err}");
    }
}

pub fn log_stream_opened(path: &Path, file_size: Option<u64>, start: u64) {
    tracing::debug!(
        file = %path.display(),
        file_size,
        start,
        "[Stream] Opened media file"
    );
}

pub fn log_stream_completed(bytes_sent: u64) {
    tracing::debug!(bytes_sent, "[Stream] Reached end of file");
}

/// Body dropped before end of file, normally because the client went away
pub fn log_client_disconnected(bytes_sent: u64) {
    tracing::info!(bytes_sent, "client disconnected");
}

pub fn log_range_ignored(range_header: &str) {
    tracing::debug!(range = range_header, "[Range] Unsupported or malformed, serving full content");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_shutdown_started(active_connections: usize) {
    tracing::info!(active_connections, "[Shutdown] Stopped accepting connections");
}

pub fn log_shutdown_completed(graceful: bool) {
    if graceful {
        tracing::info!("[Shutdown] All connections closed");
    } else {
        tracing::warn!("[Shutdown] Timed out waiting for connections, exiting anyway");
    }
}

pub fn log_bind_failed(addr: &str, err: &std::io::Error) {
    tracing::error!("Failed to listen on {addr}: {err}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

/// Access log entry waiting for its response to finish
///
/// Streamed responses only know their byte count once the body is done, so the
/// entry travels with the body and is written from there.
#[derive(Debug)]
pub struct PendingAccessLog {
    entry: AccessLogEntry,
    format: String,
    started: Instant,
}

impl PendingAccessLog {
    pub fn new(entry: AccessLogEntry, format: &str) -> Self {
        Self {
            entry,
            format: format.to_string(),
            started: Instant::now(),
        }
    }

    /// Write the entry with the final status and body size
    pub fn finish(mut self, status: u16, body_bytes: u64) {
        self.entry.status = status;
        self.entry.body_bytes = body_bytes;
        self.entry.request_time_us =
            u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
        log_access(&self.entry, &self.format);
    }
}
