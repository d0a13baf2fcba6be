use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod render;
mod server;

use config::{Config, Mode, ServerContext};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    let mode = Mode::from_env();
    logger::init(&cfg.logging);

    // Build the Tokio runtime, sizing the thread pool from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::debug!("Using {workers} worker threads");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg, mode))
}

async fn async_main(cfg: Config, mode: Mode) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let context = Arc::new(ServerContext::new(cfg, mode));
    let signals = server::start_signal_handler(Arc::clone(&context));

    tracing::info!("Listening on http://{addr} in {mode} mode");
    match mode {
        Mode::Development => tracing::info!(
            "Serving live from {}",
            context.config.site.root_dir().display()
        ),
        Mode::Production => tracing::info!(
            "Serving bundle from {}",
            context.config.site.client_dir().display()
        ),
    }

    server::start_server_loop(listener, context, signals).await;
    tracing::info!("Server stopped");
    Ok(())
}
