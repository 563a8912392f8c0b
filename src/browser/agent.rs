//! agent-browser driver
//!
//! Production [`BrowserDriver`] that shells out to the agent-browser CLI.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::browser::{BrowserDriver, ButtonInfo, CookieParams, WaitUntil};
use crate::core::{RenewError, Result};

/// Collects every `<button>` with its text and interactability flags
const BUTTON_SCAN_SCRIPT: &str = r#"JSON.stringify(Array.from(document.querySelectorAll('button')).map((btn, index) => ({
    index,
    text: (btn.textContent || '').trim(),
    visible: btn.offsetParent !== null,
    enabled: !btn.disabled
})))"#;

/// Driver for browser automation via the agent-browser CLI
pub struct AgentBrowserDriver {
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
}

impl AgentBrowserDriver {
    /// Create a new driver
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            session_name: session_name.into(),
            headed: false,
        }
    }

    /// Set headed mode
    pub fn set_headed(&mut self, headed: bool) {
        self.headed = headed;
    }

    /// Check if agent-browser is installed
    pub async fn is_available() -> bool {
        Command::new("agent-browser")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run an agent-browser command
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("agent-browser");
        cmd.args(["--session", &self.session_name]);

        if self.headed {
            cmd.arg("--headed");
        }

        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!(command = ?args.first(), "running agent-browser");

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RenewError::AgentBrowserNotFound
            } else {
                RenewError::browser(format!("Failed to run agent-browser: {}", e))
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(RenewError::browser(format!(
                "agent-browser command failed: {}",
                stderr
            )))
        }
    }

    /// Run a boolean query, tolerating whitespace around the answer
    async fn run_bool_command(&self, args: &[&str]) -> Result<bool> {
        let output = self.run_command(args).await?;
        Ok(output.trim() == "true")
    }
}

#[async_trait]
impl BrowserDriver for AgentBrowserDriver {
    async fn goto(&self, url: &str, wait: WaitUntil) -> Result<()> {
        self.run_command(&["open", url]).await?;
        self.run_command(&["wait", "--load", wait.as_str()])
            .await
            .map_err(|e| RenewError::navigation(format!("{} while loading {}", e, url)))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.run_command(&["get", "url"])
            .await
            .map(|s| s.trim().to_string())
    }

    async fn add_cookie(&self, cookie: &CookieParams) -> Result<()> {
        let expires = cookie.expires.to_string();
        let mut args: Vec<&str> = vec![
            "cookies",
            "set",
            cookie.name.as_str(),
            cookie.value.as_str(),
            "--domain",
            cookie.domain.as_str(),
            "--path",
            cookie.path.as_str(),
            "--expires",
            expires.as_str(),
            "--same-site",
            cookie.same_site.as_str(),
        ];

        if cookie.http_only {
            args.push("--http-only");
        }

        if cookie.secure {
            args.push("--secure");
        }

        self.run_command(&args).await?;
        Ok(())
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()> {
        let timeout_ms = timeout.as_millis().to_string();
        self.run_command(&["wait", selector, "--timeout", timeout_ms.as_str()])
            .await
            .map_err(|e| RenewError::navigation(format!("{} waiting for {}", e, selector)))?;
        Ok(())
    }

    async fn wait_load(&self, wait: WaitUntil, timeout: Duration) -> Result<()> {
        let timeout_ms = timeout.as_millis().to_string();
        self.run_command(&["wait", "--load", wait.as_str(), "--timeout", timeout_ms.as_str()])
            .await
            .map_err(|e| RenewError::navigation(e.to_string()))?;
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.run_command(&["fill", selector, text]).await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.run_command(&["click", selector]).await?;
        Ok(())
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.run_bool_command(&["get", "visible", selector]).await
    }

    async fn is_enabled(&self, selector: &str) -> Result<bool> {
        self.run_bool_command(&["get", "enabled", selector]).await
    }

    async fn query_buttons(&self) -> Result<Vec<ButtonInfo>> {
        let output = self.eval(BUTTON_SCAN_SCRIPT).await?;
        let buttons: Vec<ButtonInfo> = serde_json::from_str(output.trim())?;
        Ok(buttons)
    }

    async fn content(&self) -> Result<String> {
        self.run_command(&["get", "html"]).await
    }

    async fn eval(&self, script: &str) -> Result<String> {
        self.run_command(&["eval", script]).await
    }

    async fn close(&self) -> Result<()> {
        self.run_command(&["close"]).await?;
        Ok(())
    }
}
