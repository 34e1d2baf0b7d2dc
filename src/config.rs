//! Configuration management for the HTML-to-PDF server

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::render::WkHtmlToPdfConfig;

/// Default request body cap (10 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub renderer: RendererConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base for download links; derived from the request when unset
    pub public_base_url: Option<String>,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Managed directory for generated PDFs
    pub dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub wkhtmltopdf_path: String,
    pub timeout: Option<Duration>,
}

impl RendererConfig {
    pub fn wkhtmltopdf(&self) -> WkHtmlToPdfConfig {
        WkHtmlToPdfConfig {
            binary_path: self.wkhtmltopdf_path.clone(),
            timeout: self.timeout,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                public_base_url: None,
                max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            },
            storage: StorageConfig {
                dir: PathBuf::from("./temp"),
            },
            renderer: RendererConfig {
                wkhtmltopdf_path: "wkhtmltopdf".to_string(),
                timeout: None,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("SERVER_PORT")?.unwrap_or(8080),
                public_base_url: env::var("PUBLIC_BASE_URL")
                    .ok()
                    .map(|url| url.trim_end_matches('/').to_string())
                    .filter(|url| !url.is_empty()),
                max_body_bytes: parse_var("MAX_BODY_BYTES")?.unwrap_or(DEFAULT_MAX_BODY_BYTES),
            },
            storage: StorageConfig {
                dir: env::var("STORAGE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./temp")),
            },
            renderer: RendererConfig {
                wkhtmltopdf_path: env::var("WKHTMLTOPDF_PATH")
                    .unwrap_or_else(|_| "wkhtmltopdf".to_string()),
                timeout: parse_var::<u64>("RENDER_TIMEOUT_SECS")?
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
            },
        })
    }
}

/// Read an optional variable, rejecting values that do not parse
fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.dir, PathBuf::from("./temp"));
        assert!(config.server.public_base_url.is_none());
        assert!(config.renderer.timeout.is_none());
    }

    #[test]
    fn test_from_env_rejects_non_numeric_port() {
        env::set_var("SERVER_PORT", "eighty");
        let result = Config::from_env();
        env::remove_var("SERVER_PORT");

        match result {
            Err(ConfigError::InvalidValue { name, value }) => {
                assert_eq!(name, "SERVER_PORT");
                assert_eq!(value, "eighty");
            }
            other => panic!("expected invalid value, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_var_unset_and_valid() {
        env::remove_var("HTML_PDF_TEST_UNSET_VAR");
        assert_eq!(parse_var::<u64>("HTML_PDF_TEST_UNSET_VAR").unwrap(), None);

        env::set_var("HTML_PDF_TEST_TIMEOUT", " 30 ");
        assert_eq!(parse_var::<u64>("HTML_PDF_TEST_TIMEOUT").unwrap(), Some(30));
        env::remove_var("HTML_PDF_TEST_TIMEOUT");
    }

    #[test]
    fn test_renderer_config_conversion() {
        let renderer = RendererConfig {
            wkhtmltopdf_path: "/usr/local/bin/wkhtmltopdf".to_string(),
            timeout: Some(Duration::from_secs(30)),
        };
        let wk = renderer.wkhtmltopdf();
        assert_eq!(wk.binary_path, "/usr/local/bin/wkhtmltopdf");
        assert_eq!(wk.timeout, Some(Duration::from_secs(30)));
    }
}
