// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Sweeper - Stale-Resource Cleanup Job
//!
//! Exit codes:
//! - 0: clean run (including nothing to delete)
//! - 1: completed with failed deletions
//! - 2: aborted before any deletion (including configuration errors)

use std::process::ExitCode;

use anyhow::Context;
use sweeper_core::{RunExitStatus, summarize};
use sweeper_job::{JobConfig, run_job};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "sweeper=info,sweeper_job=info,sweeper_core=info,sweeper_connectors=info".into()
            }),
        )
        .init();

    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        warn!("No .env file loaded: {}", e);
    }

    match run().await {
        Ok(status) => status.into(),
        Err(e) => {
            error!(error = %format!("{e:#}"), "Cleanup job could not start");
            RunExitStatus::Aborted.into()
        }
    }
}

async fn run() -> anyhow::Result<RunExitStatus> {
    let config = JobConfig::from_env().context("Failed to load configuration")?;

    info!(
        job = config.job.as_str(),
        policy = config.policy().mode(),
        max_concurrency = config.reconciler.max_concurrency,
        "Configuration loaded"
    );

    let outcome = run_job(&config).await.context("Failed to assemble job")?;
    Ok(summarize(&outcome))
}
