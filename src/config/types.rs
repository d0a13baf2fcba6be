// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub compression: CompressionConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Site layout configuration
///
/// Development reads the template and server entry from `root`; production
/// reads both from the build output under `out_dir` (`client/` for the
/// template and static assets, `server/` for the render bundle).
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Project root holding `index.html`, `src/` and `public/`
    pub root: String,
    /// Build output directory holding `client/` and `server/`
    pub out_dir: String,
    /// Server entry artifact, relative to `root`
    pub entry: String,
}

impl SiteConfig {
    pub fn root_dir(&self) -> &Path {
        Path::new(&self.root)
    }

    pub fn public_dir(&self) -> PathBuf {
        Path::new(&self.root).join("public")
    }

    /// Template served in development: `<root>/index.html`
    pub fn source_template(&self) -> PathBuf {
        Path::new(&self.root).join("index.html")
    }

    /// Server entry loaded in development: `<root>/<entry>`
    pub fn source_entry(&self) -> PathBuf {
        Path::new(&self.root).join(&self.entry)
    }

    /// Static asset root in production: `<out_dir>/client`
    pub fn client_dir(&self) -> PathBuf {
        Path::new(&self.out_dir).join("client")
    }

    /// Template served in production: `<out_dir>/client/index.html`
    pub fn bundle_template(&self) -> PathBuf {
        self.client_dir().join("index.html")
    }

    /// Server entry loaded in production: `<out_dir>/server/<entry file name>`
    ///
    /// The build step keeps the entry's file name when it emits the server
    /// bundle, so only the file name of `entry` carries over.
    pub fn bundle_entry(&self) -> PathBuf {
        let name = Path::new(&self.entry)
            .file_name()
            .map_or_else(|| "entry-server.html".into(), ToOwned::to_owned);
        Path::new(&self.out_dir).join("server").join(name)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Response compression configuration (production mode only)
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CompressionConfig {
    pub enabled: bool,
    /// Responses smaller than this are never compressed
    pub min_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            root: "site".to_string(),
            out_dir: "dist".to_string(),
            entry: "src/entry-server.html".to_string(),
        }
    }

    #[test]
    fn test_source_paths() {
        let s = site();
        assert_eq!(s.source_template(), PathBuf::from("site/index.html"));
        assert_eq!(
            s.source_entry(),
            PathBuf::from("site/src/entry-server.html")
        );
        assert_eq!(s.public_dir(), PathBuf::from("site/public"));
    }

    #[test]
    fn test_bundle_paths() {
        let s = site();
        assert_eq!(s.client_dir(), PathBuf::from("dist/client"));
        assert_eq!(s.bundle_template(), PathBuf::from("dist/client/index.html"));
        assert_eq!(
            s.bundle_entry(),
            PathBuf::from("dist/server/entry-server.html")
        );
    }

    #[test]
    fn test_bundle_entry_keeps_file_name_only() {
        let mut s = site();
        s.entry = "app/ssr/main-server.html".to_string();
        assert_eq!(
            s.bundle_entry(),
            PathBuf::from("dist/server/main-server.html")
        );
    }
}
