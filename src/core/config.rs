//! Configuration management for renewbot
//!
//! Supports environment variables, config files, and runtime overrides.
//! Variable names match the GitHub Actions deployment
//! (`WEIRDHOST_*`, `REMEMBER_WEB_COOKIE`, `HEADLESS`).
//!
//! Config file location: ~/.config/renewbot/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{RenewError, Result};
use crate::core::types::ServerTarget;

/// Main configuration for renewbot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Control panel endpoints
    pub panel: PanelConfig,
    /// Credential sets
    pub auth: AuthConfig,
    /// Browser configuration
    pub browser: BrowserConfig,
    /// Run behavior
    #[serde(default)]
    pub run: RunConfig,
}

/// Control panel endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Authenticated-area base URL
    pub base_url: String,
    /// Login form endpoint
    pub login_url: String,
}

/// Credential sets; empty string means not configured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Remember-web session cookie value
    pub remember_cookie: String,
    /// Login form email
    pub email: String,
    /// Login form password
    pub password: String,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Whether the browser surface runs without a visible window
    pub headless: bool,
    /// Session name for agent-browser
    pub session_name: String,
    /// Default timeout for browser operations in ms
    pub timeout_ms: u64,
}

/// Run behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Comma-separated server page URLs
    pub server_urls: String,
    /// Status report path, regenerated in full each run
    pub status_file: PathBuf,
    /// Whole-run deadline in seconds
    pub run_timeout_secs: u64,
    /// Whether to log element diagnostics
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            panel: PanelConfig::default(),
            auth: AuthConfig::default(),
            browser: BrowserConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("WEIRDHOST_URL")
                .unwrap_or_else(|_| "https://hub.weirdhost.xyz".to_string()),
            login_url: env::var("WEIRDHOST_LOGIN_URL")
                .unwrap_or_else(|_| "https://hub.weirdhost.xyz/auth/login".to_string()),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            remember_cookie: env::var("REMEMBER_WEB_COOKIE").unwrap_or_default(),
            email: env::var("WEIRDHOST_EMAIL").unwrap_or_default(),
            password: env::var("WEIRDHOST_PASSWORD").unwrap_or_default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: env::var("HEADLESS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            session_name: env::var("RENEWBOT_BROWSER_SESSION")
                .unwrap_or_else(|_| "renewbot".to_string()),
            timeout_ms: 90_000,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            server_urls: env::var("WEIRDHOST_SERVER_URLS").unwrap_or_default(),
            status_file: env::var("RENEWBOT_STATUS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("README.md")),
            run_timeout_secs: 900,
            debug: env::var("RENEWBOT_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("renewbot")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(RenewError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| RenewError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| RenewError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Whether a session cookie is configured
    pub fn has_cookie_auth(&self) -> bool {
        !self.auth.remember_cookie.is_empty()
    }

    /// Whether an email/password pair is configured
    pub fn has_password_auth(&self) -> bool {
        !self.auth.email.is_empty() && !self.auth.password.is_empty()
    }

    /// Parse the configured server list, preserving order
    pub fn server_targets(&self) -> Vec<ServerTarget> {
        self.run
            .server_urls
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ServerTarget::new)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_config(server_urls: &str) -> Config {
        Config {
            panel: PanelConfig {
                base_url: "https://hub.example.com".to_string(),
                login_url: "https://hub.example.com/auth/login".to_string(),
            },
            auth: AuthConfig {
                remember_cookie: String::new(),
                email: String::new(),
                password: String::new(),
            },
            browser: BrowserConfig {
                headless: true,
                session_name: "test".to_string(),
                timeout_ms: 90_000,
            },
            run: RunConfig {
                server_urls: server_urls.to_string(),
                status_file: PathBuf::from("README.md"),
                run_timeout_secs: 900,
                debug: false,
            },
        }
    }

    #[test]
    fn test_server_list_parsing() {
        let config = bare_config(
            "https://hub.example.com/server/abc12345, https://hub.example.com/server/def67890/ ,,",
        );
        let targets = config.server_targets();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].id, "abc12345");
        assert_eq!(targets[1].id, "def67890");
    }

    #[test]
    fn test_empty_server_list() {
        let config = bare_config("");
        assert!(config.server_targets().is_empty());
    }

    #[test]
    fn test_auth_availability() {
        let mut config = bare_config("");
        assert!(!config.has_cookie_auth());
        assert!(!config.has_password_auth());

        config.auth.remember_cookie = "tokenvalue".to_string();
        assert!(config.has_cookie_auth());

        // Email alone is not a usable pair
        config.auth.email = "user@example.com".to_string();
        assert!(!config.has_password_auth());

        config.auth.password = "hunter2".to_string();
        assert!(config.has_password_auth());
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("renewbot"));
    }

    #[test]
    fn test_config_serialization() {
        let config = bare_config("https://hub.example.com/server/abc");
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("server_urls"));
    }
}
