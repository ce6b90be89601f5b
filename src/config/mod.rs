// Configuration module entry point
// Layered configuration (defaults, optional file, environment) and runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StreamConfig,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `FLV_SERVER__PORT=9000`
const ENV_PREFIX: &str = "FLV";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// A missing file is not an error, defaults apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "localhost")?
            .set_default("server.port", 8080)?
            .set_default("server.backlog", 128)?
            .set_default("stream.route", "/live.flv")?
            .set_default("stream.file", "./flv/202512241446_aac.flv")?
            .set_default("stream.chunk_size", 64 * 1024)?
            .set_default("http.cache_control", "no-cache")?
            .set_default("http.allow_origin", "*")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.shutdown_timeout", 5)?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make the server misbehave at runtime
    fn validate(&self) -> Result<(), config::ConfigError> {
        if !self.stream.route.starts_with('/') {
            return Err(config::ConfigError::Message(format!(
                "stream.route must start with '/': {}",
                self.stream.route
            )));
        }
        if self.stream.chunk_size == 0 {
            return Err(config::ConfigError::Message(
                "stream.chunk_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` string as configured
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Resolve the listen address, the host may be a name such as `localhost`
    pub async fn resolve_socket_addr(&self) -> std::io::Result<SocketAddr> {
        let address = self.listen_address();
        let resolved: Vec<SocketAddr> =
            tokio::net::lookup_host(address.as_str()).await?.collect();
        prefer_ipv4(&resolved).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                format!("No address found for {address}"),
            )
        })
    }
}

/// First IPv4 address, or the first address when there is none
fn prefer_ipv4(addrs: &[SocketAddr]) -> Option<SocketAddr> {
    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_deployment() {
        let cfg = Config::load_from("tests/no-such-config-file").expect("defaults load");
        assert_eq!(cfg.listen_address(), "localhost:8080");
        assert_eq!(cfg.stream.route, "/live.flv");
        assert_eq!(cfg.stream.file, "./flv/202512241446_aac.flv");
        assert_eq!(cfg.stream.content_type, None);
        assert_eq!(cfg.stream.chunk_size, 65536);
        assert_eq!(cfg.http.cache_control, "no-cache");
        assert_eq!(cfg.http.allow_origin, "*");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.performance.keep_alive);
        assert_eq!(cfg.performance.max_connections, None);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9090\n\n[stream]\nroute = \"/movie.flv\"\nfile = \"media/movie.flv\"\n",
        )
        .expect("write config");

        let cfg = Config::load_from(path.to_str().expect("utf-8 path")).expect("config loads");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "localhost");
        assert_eq!(cfg.stream.route, "/movie.flv");
        assert_eq!(cfg.stream.file, "media/movie.flv");
    }

    #[test]
    fn test_rejects_relative_route() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[stream]\nroute = \"live.flv\"\n").expect("write config");

        assert!(Config::load_from(path.to_str().expect("utf-8 path")).is_err());
    }

    #[tokio::test]
    async fn test_resolve_localhost() {
        let cfg = Config::load_from("tests/no-such-config-file").expect("defaults load");
        let addr = cfg.resolve_socket_addr().await.expect("localhost resolves");
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_prefer_ipv4_over_ipv6() {
        let v6: SocketAddr = "[::1]:8080".parse().expect("valid addr");
        let v4: SocketAddr = "127.0.0.1:8080".parse().expect("valid addr");

        assert_eq!(prefer_ipv4(&[v6, v4]), Some(v4));
        assert_eq!(prefer_ipv4(&[v6]), Some(v6));
        assert_eq!(prefer_ipv4(&[]), None);
    }
}
