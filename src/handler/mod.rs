//! Request handler module
//!
//! Entry point for HTTP request processing: method hygiene, asset lookup,
//! render dispatch, and access logging.

pub mod assets;
mod error;
mod ssr;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};

use crate::config::ServerContext;
use crate::http::{self, compress};
use crate::logger::AccessLogEntry;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Path with query string, what the renderer sees.
    pub url: &'a str,
    /// Path only, for asset lookup.
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub accepts_gzip: bool,
}

/// Main entry point for HTTP request handling. The request body is never
/// read; only the head drives the response.
pub async fn handle_request<B>(
    req: Request<B>,
    remote_addr: SocketAddr,
    server: Arc<ServerContext>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let url = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);

    let ctx = RequestContext {
        url: &url,
        path: req.uri().path(),
        is_head: req.method() == Method::HEAD,
        if_none_match: req
            .headers()
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        accepts_gzip: compress::accepts_gzip(req.headers()),
    };

    let response = match req.method() {
        &Method::GET | &Method::HEAD => serve(&ctx, &server).await,
        &Method::OPTIONS => http::build_options_response(),
        method => {
            tracing::warn!("Method not allowed: {method}");
            http::build_405_response()
        }
    };

    if server.config.logging.access_log {
        log_access(
            &req,
            remote_addr,
            &response,
            started.elapsed(),
            &server.config.logging.access_log_format,
        );
    }

    Ok(response)
}

/// Serve a GET or HEAD request: assets first, then the render pipeline.
async fn serve(ctx: &RequestContext<'_>, server: &ServerContext) -> Response<Full<Bytes>> {
    if let Some(response) = server.assets.try_serve(ctx).await {
        return response;
    }

    match ssr::render_page(ctx, server).await {
        Ok(response) => response,
        Err(err) => {
            let err = server.renderer.annotate_error(err);
            error::error_response(&err, server.mode)
        }
    }
}

fn log_access<B>(
    req: &Request<B>,
    remote_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    elapsed: Duration,
    format: &str,
) {
    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = http_version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = body_len(response);
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry.request_time_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
    entry.emit(format);
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn body_len(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body;
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX)
}

fn http_version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
