//! Static asset serving module
//!
//! Exact-path asset lookup in front of the render pipeline. Lookup never
//! assumes index files or file extensions, so `/` and client-side routes
//! always fall through to rendering.

use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::config::{CompressionConfig, SiteConfig};
use crate::handler::RequestContext;
use crate::http::{self, cache, compress, mime};
use crate::render::{DEV_CLIENT_JS, DEV_CLIENT_PATH};

/// Mode-specific asset source, picked once at startup.
pub enum Assets {
    /// Development: the site's public directory plus the in-memory
    /// development client.
    Source { public_dir: PathBuf },
    /// Production: the built client bundle, served with cache validators
    /// and compression.
    Dist {
        client_dir: PathBuf,
        compression: CompressionConfig,
    },
}

impl Assets {
    pub fn source(site: &SiteConfig) -> Self {
        Self::Source {
            public_dir: site.public_dir(),
        }
    }

    pub fn dist(site: &SiteConfig, compression: CompressionConfig) -> Self {
        Self::Dist {
            client_dir: site.client_dir(),
            compression,
        }
    }

    /// Try to serve the request path as a static asset. `None` means the
    /// path names no asset and the request continues to the render
    /// pipeline.
    pub async fn try_serve(&self, ctx: &RequestContext<'_>) -> Option<Response<Full<Bytes>>> {
        match self {
            Self::Source { public_dir } => serve_source(public_dir, ctx).await,
            Self::Dist {
                client_dir,
                compression,
            } => serve_dist(client_dir, *compression, ctx).await,
        }
    }
}

async fn serve_source(
    public_dir: &Path,
    ctx: &RequestContext<'_>,
) -> Option<Response<Full<Bytes>>> {
    if ctx.path == DEV_CLIENT_PATH {
        return Some(http::build_dev_asset_response(
            Bytes::from_static(DEV_CLIENT_JS.as_bytes()),
            "application/javascript",
            ctx.is_head,
        ));
    }

    let (content, content_type) = load_exact(public_dir, ctx.path).await?;
    Some(http::build_dev_asset_response(
        Bytes::from(content),
        content_type,
        ctx.is_head,
    ))
}

async fn serve_dist(
    client_dir: &Path,
    compression: CompressionConfig,
    ctx: &RequestContext<'_>,
) -> Option<Response<Full<Bytes>>> {
    let (content, content_type) = load_exact(client_dir, ctx.path).await?;

    let etag = cache::generate_etag(&content);
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return Some(http::build_304_response(&etag));
    }

    if ctx.accepts_gzip && compress::should_compress(compression, content_type, content.len()) {
        match compress::gzip(&content) {
            Ok(compressed) => {
                return Some(http::build_asset_response(
                    Bytes::from(compressed),
                    content_type,
                    &etag,
                    Some("gzip"),
                    ctx.is_head,
                ));
            }
            Err(e) => {
                tracing::warn!("Compression failed for {}: {e}, serving identity", ctx.path);
            }
        }
    }

    Some(http::build_asset_response(
        Bytes::from(content),
        content_type,
        &etag,
        None,
        ctx.is_head,
    ))
}

/// Exact-path file lookup under `dir`. Directories, misses, and anything
/// escaping `dir` return `None`.
async fn load_exact(dir: &Path, path: &str) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");
    if clean_path.is_empty() {
        return None;
    }

    let file_path = dir.join(&clean_path);

    // Security: ensure file_path is within dir
    let dir_canonical = dir.canonicalize().ok()?;
    let file_canonical = file_path.canonicalize().ok()?;
    if !file_canonical.starts_with(&dir_canonical) {
        tracing::warn!(
            "Path traversal attempt blocked: {path} -> {}",
            file_canonical.display()
        );
        return None;
    }
    if !file_canonical.is_file() {
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to read file '{}': {e}", file_canonical.display());
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::io::Read;

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            url: path,
            path,
            is_head: false,
            if_none_match: None,
            accepts_gzip: false,
        }
    }

    async fn body_bytes(response: Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    fn source_fixture() -> (tempfile::TempDir, Assets) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("public")).unwrap();
        std::fs::write(dir.path().join("public/logo.svg"), "<svg></svg>").unwrap();

        let site = SiteConfig {
            root: dir.path().to_str().unwrap().to_string(),
            out_dir: "dist".to_string(),
            entry: "src/entry-server.html".to_string(),
        };
        let assets = Assets::source(&site);
        (dir, assets)
    }

    fn dist_fixture() -> (tempfile::TempDir, Assets) {
        let dir = tempfile::tempdir().unwrap();
        let client = dir.path().join("dist/client");
        std::fs::create_dir_all(client.join("assets")).unwrap();
        std::fs::write(client.join("assets/app.js"), "console.log(1);".repeat(100)).unwrap();
        std::fs::write(client.join("favicon.ico"), [0u8; 32]).unwrap();

        let site = SiteConfig {
            root: dir.path().join("site").to_str().unwrap().to_string(),
            out_dir: dir.path().join("dist").to_str().unwrap().to_string(),
            entry: "src/entry-server.html".to_string(),
        };
        let assets = Assets::dist(
            &site,
            CompressionConfig {
                enabled: true,
                min_bytes: 512,
            },
        );
        (dir, assets)
    }

    #[tokio::test]
    async fn test_source_serves_public_file() {
        let (_dir, assets) = source_fixture();

        let response = assets.try_serve(&ctx("/logo.svg")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");
        assert_eq!(&body_bytes(response).await[..], b"<svg></svg>");
    }

    #[tokio::test]
    async fn test_source_serves_dev_client_from_memory() {
        let (_dir, assets) = source_fixture();

        let response = assets.try_serve(&ctx(DEV_CLIENT_PATH)).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "application/javascript"
        );
    }

    #[tokio::test]
    async fn test_root_falls_through() {
        let (_dir, source) = source_fixture();
        assert!(source.try_serve(&ctx("/")).await.is_none());

        let (_dir, dist) = dist_fixture();
        assert!(dist.try_serve(&ctx("/")).await.is_none());
    }

    #[tokio::test]
    async fn test_miss_falls_through() {
        let (_dir, assets) = dist_fixture();
        assert!(assets.try_serve(&ctx("/about")).await.is_none());
        assert!(assets.try_serve(&ctx("/assets/missing.js")).await.is_none());
    }

    #[tokio::test]
    async fn test_traversal_blocked() {
        let (dir, assets) = dist_fixture();
        std::fs::write(dir.path().join("secret.txt"), "top secret").unwrap();

        assert!(assets.try_serve(&ctx("/../secret.txt")).await.is_none());
        assert!(assets
            .try_serve(&ctx("/assets/../../secret.txt"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_dist_serves_gzip_when_accepted() {
        let (_dir, assets) = dist_fixture();
        let mut request = ctx("/assets/app.js");
        request.accepts_gzip = true;

        let response = assets.try_serve(&request).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("Content-Encoding").unwrap(), "gzip");
        assert_eq!(response.headers().get("Vary").unwrap(), "Accept-Encoding");

        let compressed = body_bytes(response).await;
        let mut decoder = flate2::read::GzDecoder::new(&compressed[..]);
        let mut decompressed = String::new();
        decoder.read_to_string(&mut decompressed).unwrap();
        assert_eq!(decompressed, "console.log(1);".repeat(100));
    }

    #[tokio::test]
    async fn test_dist_serves_identity_without_accept() {
        let (_dir, assets) = dist_fixture();

        let response = assets.try_serve(&ctx("/assets/app.js")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.headers().get("Content-Encoding").is_none());
        assert!(response.headers().get("ETag").is_some());
    }

    #[tokio::test]
    async fn test_dist_conditional_request_gets_304() {
        let (_dir, assets) = dist_fixture();

        let first = assets.try_serve(&ctx("/favicon.ico")).await.unwrap();
        let etag = first.headers().get("ETag").unwrap().to_str().unwrap().to_string();

        let mut request = ctx("/favicon.ico");
        request.if_none_match = Some(etag);
        let second = assets.try_serve(&request).await.unwrap();
        assert_eq!(second.status(), 304);
    }

    #[tokio::test]
    async fn test_small_files_not_compressed() {
        let (_dir, assets) = dist_fixture();
        let mut request = ctx("/favicon.ico");
        request.accepts_gzip = true;

        let response = assets.try_serve(&request).await.unwrap();
        assert!(response.headers().get("Content-Encoding").is_none());
    }
}
