// Connection handling module
// Accepts and serves a single TCP connection

use std::sync::atomic::Ordering;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config::ServerContext;
use crate::handler;

/// Accept a connection, enforcing the connection limit.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    context: &Arc<ServerContext>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = context.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = context.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            context.active_connections.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            );
            drop(stream);
            return;
        }
    }

    handle_connection(stream, peer_addr, Arc::clone(context));
}

/// Serve a single connection in a spawned task. The task owns the stream,
/// applies the configured timeouts, and decrements the connection counter
/// when the connection closes.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    context: Arc<ServerContext>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let keep_alive_timeout = context.config.performance.keep_alive_timeout;
        let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
            context.config.performance.read_timeout,
            context.config.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive_timeout > 0);

        let service_context = Arc::clone(&context);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let context = Arc::clone(&service_context);
                async move { handler::handle_request(req, peer_addr, context).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::debug!("Connection error from {peer_addr}: {err}"),
            Err(_) => {
                tracing::warn!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                );
            }
        }

        context.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}
