//! Configuration management

use crate::core::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub generator: GeneratorConfig,
    pub admin: AdminConfig,
    pub landing: LandingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the cover generator service
    pub base_url: String,
    /// Session cookie sent with every request (`name=value`)
    pub session_cookie: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Style used when none is given on the command line
    pub default_style: Option<String>,
    /// Platform preselected when an image is picked
    pub default_platform: String,
    /// Where downloads and exports are written
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Auto-refresh period for `admin watch` (seconds)
    pub refresh_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    pub github_api: String,
    /// `owner/name` of the repository whose stars are shown
    pub github_repo: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_style: None,
            default_platform: "Hashnode".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            github_api: "https://api.github.com".to_string(),
            github_repo: "ifihan/blog-cover-generator".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from default location, then apply `COVERGEN_URL`
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        if let Ok(url) = std::env::var("COVERGEN_URL") {
            config.server.base_url = url;
        }
        Ok(config)
    }

    /// Configuration exactly as stored, without environment overrides
    pub fn load_file() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::parse(&content)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse a TOML document, filling missing sections with defaults
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.admin.refresh_secs == 0 {
            return Err(Error::ConfigError {
                message: "admin.refresh_secs must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    /// Write configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        Self::ensure_home()?;
        let path = Self::config_path()?;
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = Self::covergen_home()?;
        Ok(home.join("config.toml"))
    }

    /// Get the covergen home directory
    pub fn covergen_home() -> Result<PathBuf> {
        // Check COVERGEN_HOME env var first
        if let Ok(home) = std::env::var("COVERGEN_HOME") {
            return Ok(PathBuf::from(home));
        }

        ProjectDirs::from("dev", "covergen", "covergen")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine covergen home directory".to_string(),
            })
    }

    /// Ensure home directory exists
    pub fn ensure_home() -> Result<()> {
        let home = Self::covergen_home()?;
        if !home.exists() {
            std::fs::create_dir_all(&home)?;
        }
        Ok(())
    }
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_REFRESH_SECS: u64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.admin.refresh_secs, 30);
        assert_eq!(config.generator.default_platform, "Hashnode");
        assert!(config.server.session_cookie.is_none());
    }

    #[test]
    fn test_partial_document() {
        let config = Config::parse(
            r#"
            [server]
            base_url = "https://covers.example.com"
            session_cookie = "session=abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "https://covers.example.com");
        assert_eq!(config.server.session_cookie.as_deref(), Some("session=abc"));
        assert_eq!(config.admin.refresh_secs, 30);
        assert_eq!(config.landing.github_repo, "ifihan/blog-cover-generator");
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let err = Config::parse("[admin]\nrefresh_secs = 0\n").unwrap_err();
        assert!(matches!(err, Error::ConfigError { .. }));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = Config::default();
        config.generator.default_style = Some("Cinematic".to_string());
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::parse(&text).unwrap();
        assert_eq!(parsed.generator.default_style.as_deref(), Some("Cinematic"));
    }
}
