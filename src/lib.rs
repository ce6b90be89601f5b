//! Serves a single media file over HTTP with open-ended byte-range support,
//! for playback in clients such as VLC or flv.js.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
