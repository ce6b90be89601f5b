// Server module entry point
// Listener setup, connection handling and shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::{AppState, Config};
use crate::error::BoxError;
use crate::logger;

pub use listener::create_listener;
pub use server_loop::start_server_loop;

/// Bind the configured address and serve until `shutdown` is cancelled
///
/// Failing to resolve or bind the address is returned as an error after being
/// logged; the caller treats it as fatal.
pub async fn run(cfg: Config, shutdown: CancellationToken) -> Result<(), BoxError> {
    let address = cfg.listen_address();
    let listener = match bind(&cfg).await {
        Ok(listener) => listener,
        Err(e) => {
            logger::log_bind_failed(&address, &e);
            return Err(e.into());
        }
    };

    let local_addr = listener.local_addr()?;
    logger::log_server_start(&local_addr, &cfg);

    start_server_loop(listener, Arc::new(AppState::new(&cfg)), shutdown).await;
    Ok(())
}

async fn bind(cfg: &Config) -> std::io::Result<TcpListener> {
    let addr = cfg.resolve_socket_addr().await?;
    create_listener(addr, cfg.server.backlog)
}
