//! Session establishment
//!
//! Two credential strategies: inject the remember-web cookie, or drive the
//! login form. Each path reports a plain success signal; the orchestrator
//! owns ordering and fallback. A failed cookie attempt leaves nothing behind
//! that poisons a later form attempt.

use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};
use url::Url;

use crate::browser::{BrowserDriver, CookieParams, WaitUntil};
use crate::core::{Config, RenewError, Result};

/// Laravel remember-me cookie used by the hub
const REMEMBER_COOKIE_NAME: &str = "remember_web_59ba36addc2b2f9401580f014c7f58ea4e30989d";

/// Injected cookies outlive any plausible run cadence
const COOKIE_TTL_SECS: i64 = 3600 * 24 * 365;

/// Login form controls
mod form {
    pub const USERNAME: &str = r#"input[name="username"]"#;
    pub const PASSWORD: &str = r#"input[name="password"]"#;
    pub const SUBMIT: &str = r#"button[type="submit"]"#;
}

/// A URL containing either marker places the session on a login page
pub fn is_login_url(url: &str) -> bool {
    url.contains("login") || url.contains("auth")
}

/// Whether the current page still belongs to the authenticated area.
/// Errors count as not authenticated.
pub async fn still_authenticated(driver: &dyn BrowserDriver) -> bool {
    match driver.current_url().await {
        Ok(url) => !is_login_url(&url),
        Err(e) => {
            error!(error = %e, "could not read current URL");
            false
        }
    }
}

/// Establishes an authenticated session on the configured panel
pub struct SessionEstablisher<'a> {
    driver: &'a dyn BrowserDriver,
    config: &'a Config,
}

impl<'a> SessionEstablisher<'a> {
    pub fn new(driver: &'a dyn BrowserDriver, config: &'a Config) -> Self {
        Self { driver, config }
    }

    /// Inject the remember-web cookie and verify it holds
    pub async fn login_with_cookie(&self) -> bool {
        match self.try_cookie_login().await {
            Ok(verified) => verified,
            Err(e) => {
                error!(error = %e, "cookie login failed");
                false
            }
        }
    }

    async fn try_cookie_login(&self) -> Result<bool> {
        let cookie = CookieParams {
            name: REMEMBER_COOKIE_NAME.to_string(),
            value: self.config.auth.remember_cookie.clone(),
            domain: cookie_domain(&self.config.panel.base_url)?,
            path: "/".to_string(),
            expires: Utc::now().timestamp() + COOKIE_TTL_SECS,
            http_only: true,
            secure: true,
            same_site: "Lax".to_string(),
        };

        self.driver.add_cookie(&cookie).await?;
        info!("remember-web cookie injected");

        self.driver
            .goto(&self.config.panel.base_url, WaitUntil::DomContentLoaded)
            .await?;

        self.verify().await
    }

    /// Drive the login form with the configured email/password pair
    pub async fn login_with_password(&self) -> bool {
        match self.try_password_login().await {
            Ok(verified) => verified,
            Err(e) => {
                error!(error = %e, "password login failed");
                false
            }
        }
    }

    async fn try_password_login(&self) -> Result<bool> {
        // The login form can sit behind slow redirects
        let nav_timeout = Duration::from_millis(self.config.browser.timeout_ms);

        let login_url = &self.config.panel.login_url;
        info!(url = %login_url, "opening login page");
        self.driver
            .goto(login_url, WaitUntil::DomContentLoaded)
            .await?;

        for selector in [form::USERNAME, form::PASSWORD, form::SUBMIT] {
            self.driver.wait_visible(selector, nav_timeout).await?;
        }

        self.driver
            .fill(form::USERNAME, &self.config.auth.email)
            .await?;
        self.driver
            .fill(form::PASSWORD, &self.config.auth.password)
            .await?;

        self.driver.click(form::SUBMIT).await?;
        self.driver
            .wait_load(WaitUntil::DomContentLoaded, nav_timeout)
            .await?;

        self.verify().await
    }

    /// Success means the session landed outside the login area
    async fn verify(&self) -> Result<bool> {
        let url = self.driver.current_url().await?;

        if is_login_url(&url) {
            warn!(url = %url, "still on the login page");
            Ok(false)
        } else {
            Ok(true)
        }
    }
}

/// Cookie scope is the panel's host
fn cookie_domain(base_url: &str) -> Result<String> {
    let parsed = Url::parse(base_url)
        .map_err(|e| RenewError::config(format!("Invalid panel URL {}: {}", base_url, e)))?;

    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| RenewError::config(format!("Panel URL {} has no host", base_url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_markers() {
        assert!(is_login_url("https://hub.weirdhost.xyz/auth/login"));
        assert!(is_login_url("https://hub.weirdhost.xyz/login?next=/server/a"));
        assert!(!is_login_url("https://hub.weirdhost.xyz/server/d54a8070"));
    }

    #[test]
    fn test_cookie_domain() {
        assert_eq!(
            cookie_domain("https://hub.weirdhost.xyz").unwrap(),
            "hub.weirdhost.xyz"
        );
        assert!(cookie_domain("not a url").is_err());
    }
}
