// Server context module
// Holds everything a request needs, resolved once at startup

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use super::mode::Mode;
use super::types::Config;
use crate::handler::assets::Assets;
use crate::render::{BundleRenderer, LiveRenderer, RendererProvider};

/// Shared server context. The mode picks the renderer and asset source
/// exactly once here; request handling itself never branches on mode
/// except for error disclosure.
pub struct ServerContext {
    pub config: Config,
    pub mode: Mode,
    pub renderer: Arc<dyn RendererProvider>,
    pub assets: Assets,

    // Active connection count for limits and drain on shutdown
    pub active_connections: AtomicUsize,
}

impl ServerContext {
    pub fn new(config: Config, mode: Mode) -> Self {
        let renderer: Arc<dyn RendererProvider> = match mode {
            Mode::Development => Arc::new(LiveRenderer::new(config.site.clone())),
            Mode::Production => Arc::new(BundleRenderer::new(config.site.clone())),
        };
        let assets = match mode {
            Mode::Development => Assets::source(&config.site),
            Mode::Production => Assets::dist(&config.site, config.compression),
        };

        Self {
            config,
            mode,
            renderer,
            assets,
            active_connections: AtomicUsize::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_development_context_serves_from_source() {
        let config = Config::load_from("no-such-config-file").unwrap();
        let context = ServerContext::new(config, Mode::Development);

        assert_eq!(context.mode, Mode::Development);
        assert!(matches!(context.assets, Assets::Source { .. }));
        assert_eq!(context.active_connections.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_production_context_serves_from_dist() {
        let config = Config::load_from("no-such-config-file").unwrap();
        let context = ServerContext::new(config, Mode::Production);

        assert_eq!(context.mode, Mode::Production);
        assert!(matches!(context.assets, Assets::Dist { .. }));
    }
}
