//! Configuration module for the cookbook backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Where the "Open in GitHub" link points unless overridden.
pub const DEFAULT_SOURCE_URL: &str =
    "https://github.com/teodor-i/kotlin-notebook-cookbook/blob/main/public";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON catalog file; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Directory that notebook document paths resolve against
    pub assets_dir: PathBuf,
    /// Base URL to fetch documents from instead of the assets directory
    pub assets_url: Option<String>,
    /// Language used for code cells that do not declare one
    pub default_language: String,
    /// Upper bound on a single document fetch
    pub fetch_timeout: Option<Duration>,
    /// Base URL of the published notebook sources
    pub source_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog_path = lookup("COOKBOOK_CATALOG_PATH").map(PathBuf::from);

        let assets_dir = lookup("COOKBOOK_ASSETS_DIR")
            .unwrap_or_else(|| "./public".to_string())
            .into();

        let assets_url = lookup("COOKBOOK_ASSETS_URL").filter(|url| !url.trim().is_empty());

        let default_language =
            lookup("COOKBOOK_DEFAULT_LANGUAGE").unwrap_or_else(|| "kotlin".to_string());

        let fetch_timeout = match lookup("COOKBOOK_FETCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!("Invalid COOKBOOK_FETCH_TIMEOUT_SECS: {}", raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let source_url =
            lookup("COOKBOOK_SOURCE_URL").unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string());

        let raw_addr =
            lookup("COOKBOOK_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid COOKBOOK_BIND_ADDR: {}", raw_addr)))?;

        let log_level = lookup("COOKBOOK_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            catalog_path,
            assets_dir,
            assets_url,
            default_language,
            fetch_timeout,
            source_url,
            bind_addr,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]).unwrap();

        assert!(config.catalog_path.is_none());
        assert_eq!(config.assets_dir, PathBuf::from("./public"));
        assert!(config.assets_url.is_none());
        assert_eq!(config.default_language, "kotlin");
        assert!(config.fetch_timeout.is_none());
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("COOKBOOK_CATALOG_PATH", "/etc/cookbook/catalog.json"),
            ("COOKBOOK_ASSETS_URL", "https://cdn.example.com/"),
            ("COOKBOOK_FETCH_TIMEOUT_SECS", "15"),
            ("COOKBOOK_BIND_ADDR", "0.0.0.0:9000"),
        ])
        .unwrap();

        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/etc/cookbook/catalog.json"))
        );
        assert_eq!(
            config.assets_url.as_deref(),
            Some("https://cdn.example.com/")
        );
        assert_eq!(config.fetch_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn test_blank_assets_url_is_ignored() {
        let config = config_from(&[("COOKBOOK_ASSETS_URL", "  ")]).unwrap();
        assert!(config.assets_url.is_none());
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = config_from(&[("COOKBOOK_BIND_ADDR", "not-an-addr")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = config_from(&[("COOKBOOK_FETCH_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
