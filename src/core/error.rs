//! Custom error types for renewbot
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for renewbot operations
#[derive(Error, Debug)]
pub enum RenewError {
    /// Neither credential strategy produced a verified session
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A bounded navigation or readiness wait elapsed
    #[error("Navigation timed out: {0}")]
    NavigationTimeout(String),

    /// Every locator stage was exhausted without a match
    #[error("Renewal control not found: {0}")]
    ElementNotFound(String),

    /// Click or content capture failed mid-interaction
    #[error("Interaction error: {0}")]
    Interaction(String),

    /// The whole-run deadline elapsed
    #[error("Run timed out after {0}s")]
    RunTimeout(u64),

    /// Any other unhandled failure during the run
    #[error("Run failed: {0}")]
    RunFailure(String),

    /// Browser driver errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,
}

/// Convenience Result type for renewbot operations
pub type Result<T> = std::result::Result<T, RenewError>;

impl RenewError {
    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a navigation timeout error
    pub fn navigation(msg: impl Into<String>) -> Self {
        Self::NavigationTimeout(msg.into())
    }

    /// Create an interaction error
    pub fn interaction(msg: impl Into<String>) -> Self {
        Self::Interaction(msg.into())
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
