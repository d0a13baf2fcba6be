//! HTML template loading and app markup injection.

use std::path::Path;

use crate::error::{Result, SsrError};

/// Placeholder comment marking where rendered application markup goes.
pub const APP_HTML_PLACEHOLDER: &str = "<!--app-html-->";

/// Read a template file, mapping failures to a template error that keeps
/// the offending path.
pub async fn read_template(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SsrError::Template {
            path: path.to_path_buf(),
            source,
        })
}

/// Replace the first occurrence of the app placeholder with rendered
/// markup. Later occurrences are left as-is. A template without the
/// placeholder is served untouched; that almost always means a broken
/// template, so it is logged.
pub fn inject_app_html(template: &str, app_html: &str) -> String {
    if !template.contains(APP_HTML_PLACEHOLDER) {
        tracing::warn!("template has no {APP_HTML_PLACEHOLDER} placeholder, serving unmodified");
        return template.to_string();
    }
    template.replacen(APP_HTML_PLACEHOLDER, app_html, 1)
}
