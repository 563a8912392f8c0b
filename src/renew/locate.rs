//! Renewal control discovery
//!
//! The hub's markup and copy are not contractually stable, so discovery
//! degrades through a cascade of strategies of decreasing specificity. Each
//! strategy swallows its own errors and yields to the next; the first visible
//! match wins.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::browser::{BrowserDriver, ElementRef};

/// Selectors for the renewal control
pub mod selectors {
    /// Direct text matches for the control label, with and without the inner
    /// space, as semantic and path-based variants
    pub const RENEW_TEXT: &[&str] = &[
        r#"button:has-text("시간추가")"#,
        r#"button:has-text("시간 추가")"#,
        r#"xpath=//button[contains(text(), "시간추가")]"#,
        r#"xpath=//button[contains(text(), "시간 추가")]"#,
    ];

    /// Key token of the label; survives nested markup and rewording
    pub const RENEW_TOKEN: &str = "시간";

    /// Visual-role fallback when the label itself changed
    pub const STYLED_BUTTONS: &str = "button.btn-primary, button.btn-success";

    /// Selector for the match stamped by the in-page scan
    pub const SCRIPT_TAGGED: &str = r#"button[data-renew-target="1"]"#;
}

const VISIBLE_WAIT: Duration = Duration::from_secs(10);

/// Finds the renewal control in the page and tags it for a follow-up click
const SCRIPT_SCAN: &str = r#"(() => {
    const buttons = Array.from(document.querySelectorAll('button'));
    const hit = buttons.find(btn =>
        btn.offsetParent !== null &&
        btn.textContent.includes('시간')
    );
    if (!hit) return false;
    hit.setAttribute('data-renew-target', '1');
    return true;
})()"#;

/// One way of locating the renewal control
#[async_trait]
pub trait LocateStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Attempt to locate the control. `None` on any miss or error; errors
    /// never escape a strategy.
    async fn attempt(&self, driver: &dyn BrowserDriver) -> Option<ElementRef>;
}

/// Stage 1: direct text selectors awaited visible
pub struct TextSelectors;

#[async_trait]
impl LocateStrategy for TextSelectors {
    fn name(&self) -> &'static str {
        "text_selectors"
    }

    async fn attempt(&self, driver: &dyn BrowserDriver) -> Option<ElementRef> {
        for selector in selectors::RENEW_TEXT {
            if driver.wait_visible(selector, VISIBLE_WAIT).await.is_err() {
                continue;
            }

            match driver.is_visible(selector).await {
                Ok(true) => return Some(ElementRef::new(*selector)),
                Ok(false) => continue,
                Err(e) => {
                    debug!(selector, error = %e, "visibility check failed");
                    continue;
                }
            }
        }

        None
    }
}

/// Stage 2: scan every button and match on the label's key token.
/// Covers label text wrapped in nested markup that defeats the direct
/// matchers.
pub struct ButtonScan;

#[async_trait]
impl LocateStrategy for ButtonScan {
    fn name(&self) -> &'static str {
        "button_scan"
    }

    async fn attempt(&self, driver: &dyn BrowserDriver) -> Option<ElementRef> {
        let buttons = match driver.query_buttons().await {
            Ok(buttons) => buttons,
            Err(e) => {
                debug!(error = %e, "button enumeration failed");
                return None;
            }
        };

        buttons
            .iter()
            .find(|btn| btn.visible && btn.text.trim().contains(selectors::RENEW_TOKEN))
            .map(|btn| {
                debug!(text = %btn.text, "matched button by text token");
                ElementRef::nth_button(btn.index)
            })
    }
}

/// Stage 3: first visible primary/success-styled button.
/// Covers label rewording while the styling convention persists.
pub struct StyledButton;

#[async_trait]
impl LocateStrategy for StyledButton {
    fn name(&self) -> &'static str {
        "styled_button"
    }

    async fn attempt(&self, driver: &dyn BrowserDriver) -> Option<ElementRef> {
        match driver.is_visible(selectors::STYLED_BUTTONS).await {
            Ok(true) => Some(ElementRef::new(selectors::STYLED_BUTTONS)),
            Ok(false) => None,
            Err(e) => {
                debug!(error = %e, "styled button probe failed");
                None
            }
        }
    }
}

/// Stage 4: in-page script scan against the render tree, as a last resort.
/// The match is tagged with an attribute so the click can address it.
pub struct ScriptScan;

#[async_trait]
impl LocateStrategy for ScriptScan {
    fn name(&self) -> &'static str {
        "script_scan"
    }

    async fn attempt(&self, driver: &dyn BrowserDriver) -> Option<ElementRef> {
        match driver.eval(SCRIPT_SCAN).await {
            Ok(result) if result.trim() == "true" => {
                Some(ElementRef::new(selectors::SCRIPT_TAGGED))
            }
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "script scan failed");
                None
            }
        }
    }
}

/// Ordered cascade over all locate strategies
pub struct RenewButtonLocator {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl RenewButtonLocator {
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(TextSelectors),
                Box::new(ButtonScan),
                Box::new(StyledButton),
                Box::new(ScriptScan),
            ],
        }
    }

    /// Try each strategy in order; the first hit wins. Exhaustion of every
    /// stage is the only way to get `None`.
    pub async fn locate(&self, driver: &dyn BrowserDriver) -> Option<ElementRef> {
        for strategy in &self.strategies {
            if let Some(element) = strategy.attempt(driver).await {
                info!(
                    strategy = strategy.name(),
                    selector = %element.selector,
                    "renewal control found"
                );
                return Some(element);
            }

            debug!(strategy = strategy.name(), "no match, falling through");
        }

        None
    }
}

impl Default for RenewButtonLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Log count/visibility/interactability for the direct selectors.
/// Diagnostic aid for markup drift; enabled with the debug flag.
pub async fn log_control_diagnostics(driver: &dyn BrowserDriver) {
    for selector in &selectors::RENEW_TEXT[..2] {
        let visible = driver.is_visible(selector).await.unwrap_or(false);
        let enabled = driver.is_enabled(selector).await.unwrap_or(false);
        debug!(selector, visible, enabled, "control diagnostics");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{ButtonInfo, CookieParams, WaitUntil};
    use crate::core::{RenewError, Result};

    /// Driver whose direct selectors all miss but whose button scan sees a
    /// renew control wrapped in markup
    struct NestedMarkupDriver;

    #[async_trait]
    impl BrowserDriver for NestedMarkupDriver {
        async fn goto(&self, _url: &str, _wait: WaitUntil) -> Result<()> {
            Ok(())
        }

        async fn current_url(&self) -> Result<String> {
            Ok("https://hub.example.com/server/abc".to_string())
        }

        async fn add_cookie(&self, _cookie: &CookieParams) -> Result<()> {
            Ok(())
        }

        async fn wait_visible(&self, selector: &str, _timeout: Duration) -> Result<()> {
            Err(RenewError::navigation(format!("no match for {}", selector)))
        }

        async fn wait_load(&self, _wait: WaitUntil, _timeout: Duration) -> Result<()> {
            Ok(())
        }

        async fn fill(&self, _selector: &str, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn click(&self, _selector: &str) -> Result<()> {
            Ok(())
        }

        async fn is_visible(&self, _selector: &str) -> Result<bool> {
            Ok(false)
        }

        async fn is_enabled(&self, _selector: &str) -> Result<bool> {
            Ok(true)
        }

        async fn query_buttons(&self) -> Result<Vec<ButtonInfo>> {
            Ok(vec![
                ButtonInfo {
                    index: 0,
                    text: "재시작".to_string(),
                    visible: true,
                    enabled: true,
                },
                ButtonInfo {
                    index: 1,
                    text: "시간추가".to_string(),
                    visible: true,
                    enabled: true,
                },
                ButtonInfo {
                    index: 2,
                    text: "시간추가".to_string(),
                    visible: false,
                    enabled: true,
                },
            ])
        }

        async fn content(&self) -> Result<String> {
            Ok(String::new())
        }

        async fn eval(&self, _script: &str) -> Result<String> {
            Ok("false".to_string())
        }

        async fn close(&self) -> Result<()> {
            Ok(())
        }
    }

    /// Driver with nothing on the page at all
    struct EmptyPageDriver;

    #[async_trait]
    impl BrowserDriver for EmptyPageDriver {
        async fn goto(&self, _url: &str, _wait: WaitUntil) -> Result<()> {
            Ok(())
        }

        async fn current_url(&self) -> Result<String> {
            Ok("https://hub.example.com/server/abc".to_string())
        }

        async fn add_cookie(&self, _cookie: &CookieParams) -> Result<()> {
            Ok(())
        }

        async fn wait_visible(&self, selector: &str, _timeout: Duration) -> Result<()> {
            Err(RenewError::navigation(format!("no match for {}", selector)))
        }

        async fn wait_load(&self, _wait: WaitUntil, _timeout: Duration) -> Result<()> {
            Ok(())
        }

        async fn fill(&self, _selector: &str, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn click(&self, _selector: &str) -> Result<()> {
            Ok(())
        }

        async fn is_visible(&self, _selector: &str) -> Result<bool> {
            Ok(false)
        }

        async fn is_enabled(&self, _selector: &str) -> Result<bool> {
            Ok(false)
        }

        async fn query_buttons(&self) -> Result<Vec<ButtonInfo>> {
            Ok(Vec::new())
        }

        async fn content(&self) -> Result<String> {
            Ok(String::new())
        }

        async fn eval(&self, _script: &str) -> Result<String> {
            Ok("false".to_string())
        }

        async fn close(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cascade_falls_through_to_button_scan() {
        // Stage 1 selectors match nothing, but a visible 시간추가 button
        // exists; the scan stage must still return it.
        let locator = RenewButtonLocator::new();
        let element = locator.locate(&NestedMarkupDriver).await;

        assert_eq!(element, Some(ElementRef::nth_button(1)));
    }

    #[tokio::test]
    async fn test_cascade_exhaustion_returns_none() {
        let locator = RenewButtonLocator::new();
        assert!(locator.locate(&EmptyPageDriver).await.is_none());
    }

    #[tokio::test]
    async fn test_button_scan_skips_invisible_matches() {
        // Index 2 matches the token but is invisible; index 1 wins.
        let element = ButtonScan.attempt(&NestedMarkupDriver).await;
        assert_eq!(element, Some(ElementRef::nth_button(1)));
    }
}
