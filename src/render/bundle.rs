//! Production renderer: serves the built output directory with the render
//! module cached after first load.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::render::module::HtmlModule;
use crate::render::template::read_template;
use crate::render::{RenderModule, RendererProvider};

/// Renderer provider for production mode. The template is read from the
/// client bundle per request; the render module is loaded once and kept
/// until [`RendererProvider::reload`].
pub struct BundleRenderer {
    site: SiteConfig,
    module: RwLock<Option<Arc<HtmlModule>>>,
}

impl BundleRenderer {
    pub const fn new(site: SiteConfig) -> Self {
        Self {
            site,
            module: RwLock::const_new(None),
        }
    }
}

#[async_trait]
impl RendererProvider for BundleRenderer {
    async fn index_html(&self, _url: &str) -> Result<String> {
        read_template(&self.site.bundle_template()).await
    }

    async fn load_renderer(&self, _url: &str) -> Result<Arc<dyn RenderModule>> {
        if let Some(module) = self.module.read().await.as_ref() {
            return Ok(Arc::clone(module) as Arc<dyn RenderModule>);
        }

        let mut slot = self.module.write().await;
        // Another request may have won the race while we waited.
        if let Some(module) = slot.as_ref() {
            return Ok(Arc::clone(module) as Arc<dyn RenderModule>);
        }

        let path = self.site.bundle_entry();
        let module = Arc::new(HtmlModule::load(&path).await?);
        tracing::info!("Loaded render module from {}", path.display());
        *slot = Some(Arc::clone(&module));
        Ok(module)
    }

    async fn reload(&self) {
        let had_module = self.module.write().await.take().is_some();
        if had_module {
            tracing::info!("Render module cache cleared, next request reloads from disk");
        }
    }
}
