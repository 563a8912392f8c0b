//! renewbot - unattended renewal for Weirdhost-style hosting panels
//!
//! Authenticates against the hub with a session cookie or a login form,
//! visits each configured server page, finds the renewal control through a
//! cascade of discovery strategies, clicks it, and classifies what actually
//! happened into one definite outcome per server.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Browser**: The driver capability surface and the agent-browser implementation
//! - **Renew**: Session, navigation, discovery, classification, orchestration
//! - **Report**: Status file generation and the exit-code predicate
//!
//! # Usage
//!
//! ```rust,no_run
//! use renewbot::browser::AgentBrowserDriver;
//! use renewbot::{Config, Renewer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load();
//!     let driver = AgentBrowserDriver::new(&config.browser.session_name);
//!     let renewer = Renewer::new(config, Box::new(driver));
//!
//!     for outcome in renewer.run().await {
//!         println!("{}", outcome);
//!     }
//! }
//! ```

pub mod browser;
pub mod core;
pub mod renew;
pub mod report;

// Re-export commonly used items
pub use core::{Config, Outcome, RenewError, RenewStatus, Result};
pub use renew::Renewer;
