//! The render pipeline: template in, finished page out.
//!
//! Every stage goes through the context's renderer provider, so this code
//! is identical in both modes. Stage failures bubble up to the caller,
//! which owns error presentation.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::ServerContext;
use crate::error::{Result, SsrError};
use crate::handler::RequestContext;
use crate::http::{self, compress};
use crate::render::template;

/// Render the page for the request URL and build the HTTP response.
pub async fn render_page(
    ctx: &RequestContext<'_>,
    server: &ServerContext,
) -> Result<Response<Full<Bytes>>> {
    let template_html = server.renderer.index_html(ctx.url).await?;
    let module = server.renderer.load_renderer(ctx.url).await?;
    let rendered = module.render(ctx.url).await?;

    // A provider may return markup-free output for a URL; that is a broken
    // render, not a page.
    if rendered.html.trim().is_empty() {
        return Err(SsrError::Render {
            url: ctx.url.to_string(),
            reason: "renderer produced no markup".to_string(),
        });
    }

    let page = template::inject_app_html(&template_html, &rendered.html);
    Ok(build_page_response(ctx, server, page))
}

fn build_page_response(
    ctx: &RequestContext<'_>,
    server: &ServerContext,
    page: String,
) -> Response<Full<Bytes>> {
    if server.mode.is_production()
        && ctx.accepts_gzip
        && compress::should_compress(
            server.config.compression,
            "text/html; charset=utf-8",
            page.len(),
        )
    {
        match compress::gzip(page.as_bytes()) {
            Ok(compressed) => {
                return http::build_html_response(
                    Bytes::from(compressed),
                    Some("gzip"),
                    ctx.is_head,
                );
            }
            Err(e) => {
                tracing::warn!("Compression failed for {}: {e}, serving identity", ctx.url);
            }
        }
    }

    http::build_html_response(Bytes::from(page), None, ctx.is_head)
}
