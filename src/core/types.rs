//! Shared types used across renewbot modules
//!
//! Server targets, per-server statuses, and run outcomes.

use serde::{Deserialize, Serialize};

/// A single server page eligible for renewal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTarget {
    /// Full URL of the server page
    pub url: String,
    /// Short identifier derived from the URL
    pub id: String,
}

impl ServerTarget {
    /// Create a target from its page URL, deriving the short identifier
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let id = derive_id(&url);
        Self { url, id }
    }
}

/// The final non-empty path segment names the server.
/// Trailing slashes are tolerated.
fn derive_id(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Classified result of one renewal attempt on one server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewStatus {
    /// Time was added
    Success,
    /// The hub reported the once-only window was already used
    AlreadyRenewed,
    /// Every locator stage came up empty
    NoButtonFound,
    /// The control was present but not interactable
    ButtonDisabled,
    /// The session was no longer authenticated on this page
    LoginFailed,
    /// Click or content capture raised
    ClickError,
    /// Page content changed but matched no known phrase
    UnknownChanged,
    /// Page content did not change at all
    NoChange,
    /// Unhandled error while processing this server
    Error,
}

impl RenewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenewStatus::Success => "success",
            RenewStatus::AlreadyRenewed => "already_renewed",
            RenewStatus::NoButtonFound => "no_button_found",
            RenewStatus::ButtonDisabled => "button_disabled",
            RenewStatus::LoginFailed => "login_failed",
            RenewStatus::ClickError => "click_error",
            RenewStatus::UnknownChanged => "unknown_changed",
            RenewStatus::NoChange => "no_change",
            RenewStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for RenewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-level failures that replace per-server processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatalKind {
    /// No credential set configured
    NoAuth,
    /// No server URLs configured
    NoServers,
    /// The whole-run deadline elapsed
    Timeout,
    /// Unhandled error during the run
    Runtime,
}

impl FatalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FatalKind::NoAuth => "no_auth",
            FatalKind::NoServers => "no_servers",
            FatalKind::Timeout => "timeout",
            FatalKind::Runtime => "runtime",
        }
    }
}

/// One entry in the run's result list
///
/// Renders exactly like the status strings consumed by the report and the
/// exit-code check: `"<id>: <status>"`, `"login_failed"`, or `"error: <kind>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Classified result for one server target
    Server { id: String, status: RenewStatus },
    /// Whole-run authentication failure, one per configured server
    LoginFailed,
    /// Run-level sentinel replacing per-server processing
    Fatal(FatalKind),
}

impl Outcome {
    /// Create a per-server outcome
    pub fn server(id: impl Into<String>, status: RenewStatus) -> Self {
        Self::Server {
            id: id.into(),
            status,
        }
    }

    /// Whether this outcome fails the run for exit-code purposes.
    /// Only login failures and `error:`-prefixed sentinels count; per-server
    /// statuses like `no_button_found` or `error` do not.
    pub fn is_failure(&self) -> bool {
        match self {
            Outcome::Server { status, .. } => matches!(status, RenewStatus::LoginFailed),
            Outcome::LoginFailed => true,
            Outcome::Fatal(_) => true,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Server { id, status } => write!(f, "{}: {}", id, status),
            Outcome::LoginFailed => f.write_str("login_failed"),
            Outcome::Fatal(kind) => write!(f, "error: {}", kind.as_str()),
        }
    }
}
