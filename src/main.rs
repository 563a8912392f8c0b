//! renewbot - unattended renewal for Weirdhost-style hosting panels
//!
//! Main entry point for the CLI application.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use renewbot::browser::AgentBrowserDriver;
use renewbot::core::FatalKind;
use renewbot::{report, Config, Outcome, Renewer};

/// renewbot - unattended renewal for Weirdhost-style hosting panels
#[derive(Parser, Debug)]
#[command(name = "renewbot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Enable element diagnostics
    #[arg(long, short = 'd')]
    debug: bool,

    /// Override the status report path
    #[arg(long)]
    status_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("renewbot=info")),
        )
        .init();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if args.headed {
        config.browser.headless = false;
    }

    if args.debug {
        config.run.debug = true;
    }

    if let Some(path) = args.status_file {
        config.run.status_file = path;
    }

    if !AgentBrowserDriver::is_available().await {
        anyhow::bail!(
            "agent-browser not found. Install with: npm install -g agent-browser && agent-browser install"
        );
    }

    let mut driver = AgentBrowserDriver::new(&config.browser.session_name);
    driver.set_headed(!config.browser.headless);

    let renewer = Renewer::new(config.clone(), Box::new(driver));
    let outcomes = renewer.run().await;

    info!("run summary:");
    for outcome in &outcomes {
        info!("  - {}", outcome);
    }

    print_setup_hints(&outcomes);

    report::write(&config.run.status_file, &outcomes)
        .context("failed to write status report")?;

    if report::run_failed(&outcomes) {
        error!("renewal run had failures");
        std::process::exit(1);
    }

    info!("renewal run complete");
    Ok(())
}

/// Actionable guidance for the pre-flight sentinels
fn print_setup_hints(outcomes: &[Outcome]) {
    match outcomes.first() {
        Some(Outcome::Fatal(FatalKind::NoAuth)) => {
            eprintln!("No credentials configured. Set one of:");
            eprintln!("  REMEMBER_WEB_COOKIE  - session cookie value (recommended)");
            eprintln!("  WEIRDHOST_EMAIL and WEIRDHOST_PASSWORD - login form credentials");
        }
        Some(Outcome::Fatal(FatalKind::NoServers)) => {
            eprintln!("No server URLs configured. Set WEIRDHOST_SERVER_URLS, e.g.:");
            eprintln!(
                "  WEIRDHOST_SERVER_URLS=https://hub.weirdhost.xyz/server/abc12345,https://hub.weirdhost.xyz/server/abc67890"
            );
        }
        _ => {}
    }
}
