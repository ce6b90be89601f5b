// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub stream: StreamConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Host name or IP; resolved at startup, first address wins
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Listen backlog queue size
    pub backlog: i32,
}

/// Media stream configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StreamConfig {
    /// Request path the stream is served on
    pub route: String,
    /// Media file, relative to the working directory unless absolute
    pub file: String,
    /// Overrides the extension-based Content-Type
    #[serde(default)]
    pub content_type: Option<String>,
    /// Read size for each body chunk in bytes
    pub chunk_size: usize,
}

/// HTTP header configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub cache_control: String,
    pub allow_origin: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive, `RUST_LOG` takes precedence
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    pub max_connections: Option<u64>,
    /// Seconds to wait for in-flight streams on shutdown
    pub shutdown_timeout: u64,
}
