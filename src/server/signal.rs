// Signal handling module
//
// Supported signals:
// - SIGHUP:  Reload render state (clears the cached render module)
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::config::ServerContext;

/// Signal handler state
pub struct SignalHandler {
    /// Shutdown signal (SIGTERM, SIGINT)
    pub shutdown: Notify,
    /// Whether shutdown has been requested
    pub shutdown_requested: AtomicBool,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Notify::new(),
            shutdown_requested: AtomicBool::new(false),
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix only)
///
/// Spawns a background task that listens for Unix signals. SIGHUP asks
/// the renderer to drop cached state so the next request reloads from
/// disk; SIGTERM and SIGINT stop the accept loop.
#[cfg(unix)]
pub fn start_signal_handler(context: Arc<ServerContext>) -> Arc<SignalHandler> {
    use tokio::signal::unix::{signal, SignalKind};

    let handler = Arc::new(SignalHandler::new());
    let signals = Arc::clone(&handler);

    tokio::spawn(async move {
        let mut sighup = signal(SignalKind::hangup()).expect("Failed to register SIGHUP handler");
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tracing::debug!("Signal handlers registered, pid {}", std::process::id());

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    tracing::info!("SIGHUP received, reloading render state");
                    context.renderer.reload().await;
                }

                _ = sigterm.recv() => {
                    tracing::info!("SIGTERM received, initiating graceful shutdown");
                    signals.shutdown_requested.store(true, Ordering::SeqCst);
                    signals.shutdown.notify_waiters();
                    break;
                }

                _ = sigint.recv() => {
                    tracing::info!("SIGINT received, initiating graceful shutdown");
                    signals.shutdown_requested.store(true, Ordering::SeqCst);
                    signals.shutdown.notify_waiters();
                    break;
                }
            }
        }
    });

    handler
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(_context: Arc<ServerContext>) -> Arc<SignalHandler> {
    let handler = Arc::new(SignalHandler::new());
    let signals = Arc::clone(&handler);

    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
            signals.shutdown_requested.store(true, Ordering::SeqCst);
            signals.shutdown.notify_waiters();
        }
    });

    handler
}
