// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use tokio_util::sync::CancellationToken;

/// Start signal handlers (Unix only)
///
/// Spawns a background task that cancels `shutdown` on the first SIGTERM or
/// SIGINT. Must be called from inside the runtime.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: CancellationToken) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("[Signal] SIGTERM received, shutting down"),
            _ = sigint.recv() => tracing::info!("[Signal] SIGINT received, shutting down"),
        }
        shutdown.cancel();
    });

    Ok(())
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: CancellationToken) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            tracing::info!("[Signal] Ctrl+C received, shutting down");
            shutdown.cancel();
        }
    });

    Ok(())
}
