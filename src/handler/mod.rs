//! Request handler module
//!
//! Request routing dispatch and the media stream handler.

pub mod body;
pub mod router;
pub mod stream;

// Re-export main entry point
pub use router::handle_request;
