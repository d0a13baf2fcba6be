//! Response compression module
//!
//! Gzip negotiation and encoding for production responses. Compression is
//! applied to the response body only; `ETag` values stay tied to the
//! identity bytes (see [`crate::http::cache`]).

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use hyper::header::ACCEPT_ENCODING;
use hyper::HeaderMap;

use crate::config::CompressionConfig;

/// Check whether the client accepts gzip, honoring `;q=0` opt-outs.
pub fn accepts_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value.split(',').any(|part| {
                let mut pieces = part.split(';');
                let coding = pieces.next().unwrap_or_default().trim();
                if !coding.eq_ignore_ascii_case("gzip") && coding != "*" {
                    return false;
                }
                pieces.next().map_or(true, |param| {
                    param
                        .trim()
                        .strip_prefix("q=")
                        .and_then(|q| q.parse::<f32>().ok())
                        .map_or(true, |q| q > 0.0)
                })
            })
        })
}

/// Content types worth compressing. Binary image/font/video formats are
/// already compressed and excluded.
pub fn is_compressible(content_type: &str) -> bool {
    content_type.starts_with("text/")
        || matches!(
            content_type.split(';').next().map(str::trim),
            Some(
                "application/javascript"
                    | "application/json"
                    | "application/xml"
                    | "application/wasm"
                    | "image/svg+xml"
            )
        )
}

/// Decide whether a response body should be gzip-encoded.
pub fn should_compress(config: CompressionConfig, content_type: &str, body_len: usize) -> bool {
    config.enabled && body_len >= config.min_bytes && is_compressible(content_type)
}

/// Gzip-encode a body with the default compression level.
pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn headers_with_accept(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_ENCODING, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_accepts_gzip() {
        assert!(accepts_gzip(&headers_with_accept("gzip")));
        assert!(accepts_gzip(&headers_with_accept("gzip, deflate, br")));
        assert!(accepts_gzip(&headers_with_accept("deflate, gzip;q=0.8")));
        assert!(accepts_gzip(&headers_with_accept("*")));
    }

    #[test]
    fn test_rejects_without_gzip() {
        assert!(!accepts_gzip(&HeaderMap::new()));
        assert!(!accepts_gzip(&headers_with_accept("deflate, br")));
        assert!(!accepts_gzip(&headers_with_accept("gzip;q=0")));
        assert!(!accepts_gzip(&headers_with_accept("gzip;q=0.0")));
    }

    #[test]
    fn test_is_compressible() {
        assert!(is_compressible("text/html; charset=utf-8"));
        assert!(is_compressible("text/css"));
        assert!(is_compressible("application/javascript"));
        assert!(is_compressible("image/svg+xml"));
        assert!(!is_compressible("image/png"));
        assert!(!is_compressible("font/woff2"));
        assert!(!is_compressible("application/octet-stream"));
    }

    #[test]
    fn test_should_compress_threshold() {
        let config = CompressionConfig {
            enabled: true,
            min_bytes: 512,
        };
        assert!(should_compress(config, "text/html; charset=utf-8", 512));
        assert!(!should_compress(config, "text/html; charset=utf-8", 511));
        assert!(!should_compress(config, "image/png", 4096));

        let disabled = CompressionConfig {
            enabled: false,
            min_bytes: 512,
        };
        assert!(!should_compress(disabled, "text/html; charset=utf-8", 4096));
    }

    #[test]
    fn test_gzip_roundtrip() {
        let body = "hello world ".repeat(100);
        let compressed = gzip(body.as_bytes()).unwrap();
        assert!(compressed.len() < body.len());

        let mut decoder = flate2::read::GzDecoder::new(&compressed[..]);
        let mut decompressed = String::new();
        decoder.read_to_string(&mut decompressed).unwrap();
        assert_eq!(decompressed, body);
    }
}
