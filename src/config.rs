//! Application configuration, loaded once at startup.
//!
//! Priority for every value: config.toml > environment variable > default.
//! A `.env` file is honored for the environment step (via dotenvy).
//! The resulting struct is immutable and passed to handlers through
//! `AppState`; nothing reads configuration ambiently after startup.

use serde::Deserialize;
use std::path::PathBuf;

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    site: Option<SiteSection>,
    server: Option<ServerSection>,
    upload: Option<UploadSection>,
}

#[derive(Debug, Default, Deserialize)]
struct SiteSection {
    name: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    bind_addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct UploadSection {
    max_upload_mb: Option<u64>,
    scratch_dir: Option<String>,
}

/// Immutable application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Site name shown in page titles
    pub site_name: String,
    /// Public base URL, used for robots.txt and sitemap.xml
    pub site_url: String,
    /// Maximum accepted upload size in megabytes
    pub max_upload_mb: u64,
    /// Address to bind to
    pub bind_addr: String,
    /// Port to listen on
    pub port: u16,
    /// Directory for transient per-request uploaded files
    pub scratch_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_name: "FileTools".to_string(),
            site_url: "http://localhost:3000".to_string(),
            max_upload_mb: 25,
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
            scratch_dir: PathBuf::from("data/scratch"),
        }
    }
}

impl AppConfig {
    /// Load configuration with priority: config.toml > .env/env vars > defaults.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        let file = match std::fs::read_to_string("config.toml") {
            Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                Ok(file) => {
                    tracing::info!("Loaded configuration from config.toml");
                    file
                }
                Err(e) => {
                    tracing::warn!("Ignoring malformed config.toml: {}", e);
                    ConfigFile::default()
                }
            },
            Err(_) => ConfigFile::default(),
        };

        let defaults = Self::default();
        let site = file.site.unwrap_or_default();
        let server = file.server.unwrap_or_default();
        let upload = file.upload.unwrap_or_default();

        Self {
            site_name: site
                .name
                .or_else(|| std::env::var("SITE_NAME").ok())
                .unwrap_or(defaults.site_name),
            site_url: site
                .url
                .or_else(|| std::env::var("SITE_URL").ok())
                .unwrap_or(defaults.site_url),
            max_upload_mb: upload
                .max_upload_mb
                .or_else(|| env_parse("MAX_UPLOAD_MB"))
                .unwrap_or(defaults.max_upload_mb),
            bind_addr: server
                .bind_addr
                .or_else(|| std::env::var("BIND_ADDR").ok())
                .unwrap_or(defaults.bind_addr),
            port: server
                .port
                .or_else(|| env_parse("PORT"))
                .unwrap_or(defaults.port),
            scratch_dir: upload
                .scratch_dir
                .map(PathBuf::from)
                .or_else(|| std::env::var("SCRATCH_DIR").ok().map(PathBuf::from))
                .unwrap_or(defaults.scratch_dir),
        }
    }

    /// Maximum accepted request body size in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb as usize * 1024 * 1024
    }

    /// Full address to bind the listener to.
    pub fn server_bind_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Base site URL without a trailing slash.
    pub fn site_base(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.max_upload_mb, 25);
        assert_eq!(config.max_upload_bytes(), 25 * 1024 * 1024);
        assert_eq!(config.server_bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn site_base_trims_trailing_slash() {
        let config = AppConfig {
            site_url: "https://example.com/".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.site_base(), "https://example.com");
    }
}
