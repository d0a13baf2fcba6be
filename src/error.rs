//! Error types for the render host.
//!
//! Every failure on the request path collapses into [`SsrError`] so the
//! handler can hand it to the generic error responder unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while serving a render request.
#[derive(Error, Debug)]
pub enum SsrError {
    /// Template file missing or unreadable.
    #[error("template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Render module artifact missing or unreadable.
    #[error("render module {}: {source}", path.display())]
    ModuleLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Render module artifact present but unusable.
    #[error("render module {}: {reason}", path.display())]
    ModuleInvalid { path: PathBuf, reason: String },

    /// The render invocation itself failed.
    #[error("render failed for {url}: {reason}")]
    Render { url: String, reason: String },

    /// An error carrying an extra diagnostic trace, attached by the
    /// development renderer before the error is forwarded.
    #[error("{inner}")]
    Annotated {
        #[source]
        inner: Box<SsrError>,
        trace: String,
    },
}

impl SsrError {
    /// Wrap the error with a diagnostic trace. Annotating twice keeps the
    /// original error and concatenates the traces.
    pub fn annotated(self, trace: String) -> Self {
        match self {
            Self::Annotated {
                inner,
                trace: existing,
            } => Self::Annotated {
                inner,
                trace: format!("{existing}\n{trace}"),
            },
            other => Self::Annotated {
                inner: Box::new(other),
                trace,
            },
        }
    }

    /// Full diagnostic text: the error message plus any attached trace.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Annotated { inner, trace } => format!("{inner}\n{trace}"),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SsrError>;
