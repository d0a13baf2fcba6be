//! Server-side rendering pipeline.
//!
//! A [`RendererProvider`] owns everything mode-specific about producing a
//! page: where the HTML template comes from, whether it gets transformed,
//! and how the render module is obtained. The request handler drives the
//! same pipeline in both modes and never branches on the mode itself.

mod bundle;
mod live;
mod module;
pub mod template;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use bundle::BundleRenderer;
pub use live::{LiveRenderer, DEV_CLIENT_JS, DEV_CLIENT_PATH};

/// Output of a render invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Application markup destined for the template's app slot.
    pub html: String,
}

/// A loaded render module, ready to produce markup for request URLs.
#[async_trait]
pub trait RenderModule: Send + Sync {
    async fn render(&self, url: &str) -> Result<Rendered>;
}

/// Mode-specific source of templates and render modules.
///
/// `url` is the request path; providers that resolve per-route modules can
/// use it, the built-in providers ignore it.
#[async_trait]
pub trait RendererProvider: Send + Sync {
    /// Produce the HTML template for this request, transformed if the
    /// provider calls for it.
    async fn index_html(&self, url: &str) -> Result<String>;

    /// Obtain the render module for this request.
    async fn load_renderer(&self, url: &str) -> Result<Arc<dyn RenderModule>>;

    /// Attach provider-specific diagnostics to a pipeline error before it
    /// reaches the error responder.
    fn annotate_error(&self, err: crate::error::SsrError) -> crate::error::SsrError {
        err
    }

    /// Drop any cached state so the next request reloads from disk.
    async fn reload(&self) {}
}
