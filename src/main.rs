//! Subject metadata audit binary.
//!
//! Registers an echo service under the `acme` group on a local NATS
//! server, checks that each metadata view reports the grouped subject,
//! and probes live delivery. One ✅/❌ line per check; the exit code
//! stays 0 no matter how many checks fail.
//!
//! Run a nats-server on localhost:4222, then run this binary.

use anyhow::{Context, Result};
use subject_audit::{run_audit, NatsBroker};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Broker address the audit connects to.
const NATS_URL: &str = "nats://127.0.0.1:4222";

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    info!("connecting to {NATS_URL}");
    let broker = NatsBroker::connect(NATS_URL)
        .await
        .context("broker unreachable")?;

    let checks = run_audit(&broker).await.context("audit aborted")?;

    for check in &checks {
        println!("{check}");
    }

    let passed = checks.iter().filter(|check| check.passed).count();
    info!("{passed}/{} checks passed", checks.len());

    Ok(())
}
