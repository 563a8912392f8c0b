//! Click execution
//!
//! One pass, no retries: check interactability, capture, click, settle,
//! capture again, classify. Rerunning is safe; the hub's own once-only
//! enforcement surfaces as `already_renewed`.

use std::time::Duration;

use tracing::{error, info};

use crate::browser::{BrowserDriver, ElementRef};
use crate::core::{RenewError, RenewStatus, Result};
use crate::renew::classify::{classify, ClickObservation};

/// Toasts and inline messages render within this window
const POST_CLICK_SETTLE: Duration = Duration::from_secs(5);

/// Click the located control and classify what happened.
/// Driver failures fold into `click_error`; nothing escapes.
pub async fn execute(
    driver: &dyn BrowserDriver,
    control: &ElementRef,
    server_id: &str,
) -> RenewStatus {
    match try_execute(driver, control, server_id).await {
        Ok(status) => status,
        Err(e) => {
            error!(server = server_id, error = %e, "click attempt failed");
            RenewStatus::ClickError
        }
    }
}

async fn try_execute(
    driver: &dyn BrowserDriver,
    control: &ElementRef,
    server_id: &str,
) -> Result<RenewStatus> {
    if !driver.is_enabled(&control.selector).await? {
        return Ok(classify(&ClickObservation {
            enabled: false,
            click_failed: false,
            before: String::new(),
            after: String::new(),
        }));
    }

    let before = capture(driver).await?;

    info!(server = server_id, selector = %control.selector, "clicking renewal control");
    driver
        .click(&control.selector)
        .await
        .map_err(|e| RenewError::interaction(format!("click failed: {}", e)))?;

    tokio::time::sleep(POST_CLICK_SETTLE).await;

    let after = capture(driver).await?;

    Ok(classify(&ClickObservation {
        enabled: true,
        click_failed: false,
        before,
        after,
    }))
}

async fn capture(driver: &dyn BrowserDriver) -> Result<String> {
    driver
        .content()
        .await
        .map_err(|e| RenewError::interaction(format!("content capture failed: {}", e)))
}
