// Configuration module entry point
// Layers defaults, an optional config file, and RENDERD__* environment
// variables, then resolves the runtime mode.

mod context;
mod mode;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use context::ServerContext;
pub use mode::Mode;
pub use types::{CompressionConfig, Config, LoggingConfig, SiteConfig};

impl Config {
    /// Load configuration from the default `config.toml` next to the binary.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension).
    /// The file is optional; every key has a default and any key can be
    /// overridden with `RENDERD__<SECTION>__<KEY>` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("RENDERD").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("site.root", "site")?
            .set_default("site.out_dir", "dist")?
            .set_default("site.entry", "src/entry-server.html")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("compression.enabled", true)?
            .set_default("compression.min_bytes", 512)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults_without_config_file() {
        let config = Config::load_from("no-such-config-file").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.workers, None);
        assert_eq!(config.site.root_dir(), Path::new("site"));
        assert_eq!(config.site.client_dir(), Path::new("dist/client"));
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.access_log);
        assert_eq!(config.logging.access_log_format, "combined");
        assert!(config.compression.enabled);
        assert_eq!(config.compression.min_bytes, 512);
    }

    #[test]
    fn test_env_override_wins_over_defaults() {
        // Keyed off a setting no other test asserts, since the environment
        // is shared across the whole test process.
        std::env::set_var("RENDERD__PERFORMANCE__READ_TIMEOUT", "42");
        let config = Config::load_from("no-such-config-file");
        std::env::remove_var("RENDERD__PERFORMANCE__READ_TIMEOUT");

        assert_eq!(config.unwrap().performance.read_timeout, 42);
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_from("no-such-config-file").unwrap();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_socket_addr_rejects_bad_host() {
        let mut config = Config::load_from("no-such-config-file").unwrap();
        config.server.host = "not a host".to_string();
        assert!(config.socket_addr().is_err());
    }
}
