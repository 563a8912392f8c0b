//! Browser automation module
//!
//! The renewal engine never talks to a browser directly; it drives this
//! capability surface. Production wraps the agent-browser CLI, tests supply
//! a scripted fake.

mod agent;

pub use agent::AgentBrowserDriver;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::Result;

/// Navigation wait conditions understood by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// DOM parsed; subresources may still be loading
    DomContentLoaded,
    /// No network activity for a defined interval
    NetworkIdle,
}

impl WaitUntil {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitUntil::DomContentLoaded => "domcontentloaded",
            WaitUntil::NetworkIdle => "networkidle",
        }
    }
}

/// A cookie injected into the browsing context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieParams {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Unix expiry timestamp in seconds
    pub expires: i64,
    pub http_only: bool,
    pub secure: bool,
    /// "Lax", "Strict", or "None"
    pub same_site: String,
}

/// One `<button>` element as reported by the driver's page scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonInfo {
    /// Zero-based index in document order
    pub index: usize,
    /// Trimmed text content
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub enabled: bool,
}

/// Handle to a located element, expressed as a selector the driver can act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    pub selector: String,
}

impl ElementRef {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    /// Selector addressing the nth `<button>` in document order
    pub fn nth_button(index: usize) -> Self {
        Self {
            selector: format!("button >> nth={}", index),
        }
    }
}

/// Capability surface of the external browsing engine
///
/// Every method maps to one page-level capability; all waits are bounded by
/// the caller-supplied timeout or the driver's configured default.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate and block until the wait condition holds
    async fn goto(&self, url: &str, wait: WaitUntil) -> Result<()>;

    /// URL of the current page
    async fn current_url(&self) -> Result<String>;

    /// Inject a cookie into the browsing context
    async fn add_cookie(&self, cookie: &CookieParams) -> Result<()>;

    /// Block until the selector matches a visible element
    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Block until the given load state holds on the current page
    async fn wait_load(&self, wait: WaitUntil, timeout: Duration) -> Result<()>;

    /// Replace the value of the matched input
    async fn fill(&self, selector: &str, text: &str) -> Result<()>;

    /// Click the first element matched by the selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Whether the selector currently matches a visible element
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Whether the matched element is interactable
    async fn is_enabled(&self, selector: &str) -> Result<bool>;

    /// Enumerate every `<button>` on the page
    async fn query_buttons(&self) -> Result<Vec<ButtonInfo>>;

    /// Full-page content snapshot
    async fn content(&self) -> Result<String>;

    /// Evaluate a script in the page, returning its stringified result
    async fn eval(&self, script: &str) -> Result<String>;

    /// Tear down the browsing session
    async fn close(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_until_strings() {
        assert_eq!(WaitUntil::DomContentLoaded.as_str(), "domcontentloaded");
        assert_eq!(WaitUntil::NetworkIdle.as_str(), "networkidle");
    }

    #[test]
    fn test_nth_button_selector() {
        assert_eq!(ElementRef::nth_button(3).selector, "button >> nth=3");
    }
}
