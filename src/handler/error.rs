//! Generic request error responder.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::Mode;
use crate::error::SsrError;
use crate::http::build_500_response;

/// Convert a pipeline error into the client-facing 500. The full
/// diagnostic always goes to the server log; it reaches the response body
/// only in development.
pub fn error_response(err: &SsrError, mode: Mode) -> Response<Full<Bytes>> {
    tracing::error!("Request failed: {}", err.diagnostic());

    let body = if mode.is_production() {
        "500 Internal Server Error".to_string()
    } else {
        format!("500 Internal Server Error\n\n{}", err.diagnostic())
    };
    build_500_response(body)
}
