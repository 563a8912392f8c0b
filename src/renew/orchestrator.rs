//! Run orchestration
//!
//! Sequences authentication and per-server processing over one browsing
//! session, strictly in configured order, and converts every failure into a
//! tagged outcome. The session is closed on every exit path.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::browser::BrowserDriver;
use crate::core::{Config, FatalKind, Outcome, RenewError, RenewStatus, Result, ServerTarget};
use crate::renew::locate::{log_control_diagnostics, RenewButtonLocator};
use crate::renew::session::{still_authenticated, SessionEstablisher};
use crate::renew::{action, navigate};

/// Delay between servers to throttle against the hub
const SERVER_THROTTLE: Duration = Duration::from_secs(5);

/// Drives the full renewal workflow
pub struct Renewer {
    config: Config,
    driver: Box<dyn BrowserDriver>,
    locator: RenewButtonLocator,
}

impl Renewer {
    pub fn new(config: Config, driver: Box<dyn BrowserDriver>) -> Self {
        Self {
            config,
            driver,
            locator: RenewButtonLocator::new(),
        }
    }

    /// Run the workflow and return one outcome per server, in input order.
    ///
    /// Pre-flight failures return a single sentinel; authentication failure
    /// fills every server slot; a run-level timeout or error fills every
    /// slot with the matching sentinel.
    pub async fn run(&self) -> Vec<Outcome> {
        if !self.config.has_cookie_auth() && !self.config.has_password_auth() {
            error!("no credential set configured");
            return vec![Outcome::Fatal(FatalKind::NoAuth)];
        }

        let targets = self.config.server_targets();
        if targets.is_empty() {
            error!("no server URLs configured");
            return vec![Outcome::Fatal(FatalKind::NoServers)];
        }

        info!(servers = targets.len(), "starting renewal run");
        for (i, target) in targets.iter().enumerate() {
            info!(index = i + 1, url = %target.url, "server queued");
        }

        let deadline = Duration::from_secs(self.config.run.run_timeout_secs);
        let result = tokio::time::timeout(deadline, self.run_inner(&targets)).await;

        // The session dies with the run, whatever happened above.
        if let Err(e) = self.driver.close().await {
            warn!(error = %e, "failed to close browser session");
        }

        match result {
            Ok(Ok(outcomes)) => outcomes,
            Ok(Err(e)) => {
                error!(error = %e, "renewal run failed");
                vec![Outcome::Fatal(FatalKind::Runtime); targets.len()]
            }
            Err(_) => {
                let e = RenewError::RunTimeout(self.config.run.run_timeout_secs);
                error!(error = %e, "renewal run aborted");
                vec![Outcome::Fatal(FatalKind::Timeout); targets.len()]
            }
        }
    }

    async fn run_inner(&self, targets: &[ServerTarget]) -> Result<Vec<Outcome>> {
        let session = SessionEstablisher::new(self.driver.as_ref(), &self.config);
        let mut logged_in = false;

        if self.config.has_cookie_auth() {
            info!("attempting cookie authentication");
            logged_in = session.login_with_cookie().await;

            if logged_in {
                info!("cookie authentication verified");
            } else {
                warn!("cookie authentication failed; cookie may have expired");
            }
        }

        if !logged_in && self.config.has_password_auth() {
            info!("attempting password authentication");
            logged_in = session.login_with_password().await;

            if logged_in {
                info!("password authentication verified");
            }
        }

        if !logged_in {
            let e = RenewError::auth("no credential strategy verified");
            error!(error = %e, "authentication failed");
            return Ok(vec![Outcome::LoginFailed; targets.len()]);
        }

        let mut outcomes = Vec::with_capacity(targets.len());

        for (i, target) in targets.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(SERVER_THROTTLE).await;
            }

            let outcome = self.process_server(target).await;
            info!(server = %target.id, outcome = %outcome, "server processed");
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Process one server; every failure is converted to an outcome here so
    /// later servers still run.
    async fn process_server(&self, target: &ServerTarget) -> Outcome {
        info!(server = %target.id, "processing server");

        match self.try_process(target).await {
            Ok(status) => Outcome::server(&target.id, status),
            Err(e) => {
                error!(server = %target.id, error = %e, "server processing failed");
                Outcome::server(&target.id, RenewStatus::Error)
            }
        }
    }

    async fn try_process(&self, target: &ServerTarget) -> Result<RenewStatus> {
        navigate::goto_ready(self.driver.as_ref(), &target.url, &target.id).await?;

        if self.config.run.debug {
            log_control_diagnostics(self.driver.as_ref()).await;
        }

        // Sessions can silently expire mid-run
        if !still_authenticated(self.driver.as_ref()).await {
            warn!(server = %target.id, "session no longer authenticated");
            return Ok(RenewStatus::LoginFailed);
        }

        let Some(control) = self.locator.locate(self.driver.as_ref()).await else {
            warn!(server = %target.id, "renewal control not found");
            return Ok(RenewStatus::NoButtonFound);
        };

        Ok(action::execute(self.driver.as_ref(), &control, &target.id).await)
    }
}
