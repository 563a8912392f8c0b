//! Page readiness
//!
//! Server pages load content in several asynchronous phases with no single
//! reliable "loaded" signal, so readiness is layered: a network-idle
//! navigation, a bounded wait for a known content container, a second bounded
//! idle wait for late XHR content, and a fixed settle delay for script-driven
//! DOM mutation.

use std::time::Duration;

use tracing::{debug, warn};

use crate::browser::{BrowserDriver, WaitUntil};
use crate::core::Result;

/// Containers that mark the server page's main content
pub const CONTENT_CONTAINERS: &str = ".server-details, .server-info, .card, .panel";

const CONTENT_WAIT: Duration = Duration::from_secs(10);
const LATE_IDLE_WAIT: Duration = Duration::from_secs(15);
const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Navigate to a server page and block until it is ready for inspection.
///
/// Only the initial navigation is fatal; the secondary waits are advisory
/// (markup may have changed) and log their misses.
pub async fn goto_ready(driver: &dyn BrowserDriver, url: &str, server_id: &str) -> Result<()> {
    driver.goto(url, WaitUntil::NetworkIdle).await?;

    match driver.wait_visible(CONTENT_CONTAINERS, CONTENT_WAIT).await {
        Ok(()) => debug!(server = server_id, "main content loaded"),
        Err(_) => warn!(server = server_id, "main content container not found"),
    }

    match driver.wait_load(WaitUntil::NetworkIdle, LATE_IDLE_WAIT).await {
        Ok(()) => debug!(server = server_id, "network idle"),
        Err(_) => warn!(server = server_id, "network did not fully quiesce"),
    }

    tokio::time::sleep(SETTLE_DELAY).await;

    Ok(())
}
