//! The built-in render module: a prerendered HTML fragment on disk.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{Result, SsrError};
use crate::render::{RenderModule, Rendered};

/// Render module backed by an HTML fragment file. The fragment is read and
/// validated once at load; rendering hands out the markup unchanged.
#[derive(Debug)]
pub struct HtmlModule {
    fragment: String,
}

impl HtmlModule {
    /// Load and validate a fragment file. The file must be UTF-8 and
    /// contain actual markup.
    pub async fn load(path: &Path) -> Result<Self> {
        let fragment =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SsrError::ModuleLoad {
                    path: path.to_path_buf(),
                    source,
                })?;

        if fragment.trim().is_empty() {
            return Err(SsrError::ModuleInvalid {
                path: path.to_path_buf(),
                reason: "module is empty".to_string(),
            });
        }

        Ok(Self { fragment })
    }
}

#[async_trait]
impl RenderModule for HtmlModule {
    async fn render(&self, _url: &str) -> Result<Rendered> {
        Ok(Rendered {
            html: self.fragment.clone(),
        })
    }
}
