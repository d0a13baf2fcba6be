//! Runtime mode selection.
//!
//! One environment flag decides between development and production behavior.
//! It is read exactly once at startup; the choice is fixed for the process
//! lifetime.

use std::env;
use std::fmt;

/// Environment variable consulted by [`Mode::from_env`].
pub const MODE_VAR: &str = "APP_ENV";

/// Server operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Live source loading, per-request template transformation, no caching.
    Development,
    /// Precompiled bundles, static asset serving, compression.
    Production,
}

impl Mode {
    /// Read the mode from `APP_ENV`. Only the value `production` selects
    /// production; an unset variable or any other value means development.
    pub fn from_env() -> Self {
        Self::from_flag(env::var(MODE_VAR).ok().as_deref())
    }

    /// Parse a flag value. Comparison is trimmed and case-insensitive.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some(value) if value.trim().eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }

    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_flag() {
        assert_eq!(Mode::from_flag(Some("production")), Mode::Production);
        assert_eq!(Mode::from_flag(Some("PRODUCTION")), Mode::Production);
        assert_eq!(Mode::from_flag(Some("  production ")), Mode::Production);
    }

    #[test]
    fn test_everything_else_is_development() {
        assert_eq!(Mode::from_flag(None), Mode::Development);
        assert_eq!(Mode::from_flag(Some("")), Mode::Development);
        assert_eq!(Mode::from_flag(Some("dev")), Mode::Development);
        assert_eq!(Mode::from_flag(Some("prod")), Mode::Development);
        assert_eq!(Mode::from_flag(Some("staging")), Mode::Development);
    }

    #[test]
    fn test_display() {
        assert_eq!(Mode::Development.to_string(), "development");
        assert_eq!(Mode::Production.to_string(), "production");
    }
}
