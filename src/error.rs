//! Error types

use std::io;
use std::path::PathBuf;

/// Process-level error type used by the entry point and server setup
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures while preparing a media stream, before any header is sent
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("failed to open media file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to seek media file to byte {offset}: {source}")]
    Seek { offset: u64, source: io::Error },
}

impl StreamError {
    /// Whether the client should see this as a missing resource
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}
