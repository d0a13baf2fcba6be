// Server loop module
// Accepts connections until shutdown, then drains in-flight requests

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::ServerContext;

/// How long shutdown waits for in-flight connections before giving up.
const DRAIN_TIMEOUT_SECS: u64 = 10;

/// Accept loop. Runs until a shutdown signal arrives, then stops
/// accepting, drops the listener, and waits for active connections to
/// finish.
pub async fn start_server_loop(
    listener: TcpListener,
    context: Arc<ServerContext>,
    signals: Arc<SignalHandler>,
) {
    loop {
        // A signal that landed while an accept was being handled re-arms
        // nothing, so the flag is checked before parking again.
        if signals.shutdown_requested.load(Ordering::SeqCst) {
            break;
        }

        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &context);
                    }
                    Err(e) => {
                        tracing::error!("Failed to accept connection: {e}");
                    }
                }
            }

            () = signals.shutdown.notified() => {
                break;
            }
        }
    }

    tracing::info!("Shutdown requested, no longer accepting connections");

    drop(listener);
    drain_connections(&context).await;
}

/// Poll the active connection counter until it reaches zero or the drain
/// deadline passes.
async fn drain_connections(context: &ServerContext) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(DRAIN_TIMEOUT_SECS);

    loop {
        let active = context.active_connections.load(Ordering::SeqCst);
        if active == 0 {
            tracing::info!("All connections closed");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!("Drain deadline reached with {active} connections still open");
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Mode};

    #[tokio::test]
    async fn test_loop_exits_on_shutdown() {
        let listener = super::super::listener::create_reusable_listener(
            "127.0.0.1:0".parse().unwrap(),
        )
        .unwrap();
        let config = Config::load_from("no-such-config-file").unwrap();
        let context = Arc::new(ServerContext::new(config, Mode::Production));
        let signals = Arc::new(SignalHandler::new());

        let loop_task = tokio::spawn(start_server_loop(
            listener,
            Arc::clone(&context),
            Arc::clone(&signals),
        ));

        // Give the loop a moment to reach the select before notifying.
        tokio::time::sleep(Duration::from_millis(20)).await;
        signals.shutdown.notify_waiters();

        tokio::time::timeout(Duration::from_secs(1), loop_task)
            .await
            .expect("loop should exit after shutdown")
            .unwrap();
    }
}
