//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! rendering pipeline. Shared between asset serving and page responses.

pub mod cache;
pub mod compress;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_405_response, build_500_response, build_asset_response,
    build_dev_asset_response, build_html_response, build_options_response,
};
