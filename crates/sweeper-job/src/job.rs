// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Job wiring: builds the collaborators named by a [`JobConfig`] and runs one
//! reconciliation.

use std::sync::Arc;

use sweeper_connectors::{
    ArtifactoryBackend, ArtifactoryConfig, ConnectorError, EbsSnapshotBackend, HttpClient,
    SlackNotifier, SnsNotifier, load_sdk_config,
};
use sweeper_core::backend::{Deleter, InventoryBackend, LogNotifier, Notifier};
use sweeper_core::{InventorySource, Reconciler, RunContext, RunOutcome};
use tracing::info;

use crate::config::{JobConfig, JobKind, NotifierConfig};

/// Errors raised while assembling a job.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// A connector could not be built.
    #[error("Failed to build connector: {0}")]
    Connector(#[from] ConnectorError),
    /// The configuration does not describe a runnable job.
    #[error("Invalid job configuration: {0}")]
    Config(String),
}

/// Collaborators of one job.
pub struct JobParts {
    /// Inventory to enumerate.
    pub backend: Arc<dyn InventoryBackend>,
    /// Deleter for stale resources.
    pub deleter: Arc<dyn Deleter>,
    /// Notification channel.
    pub notifier: Arc<dyn Notifier>,
}

/// Build every collaborator the configuration names.
///
/// One HTTP client and (when needed) one AWS configuration are created and
/// shared by all collaborators of the job.
pub async fn build_parts(config: &JobConfig) -> Result<JobParts, JobError> {
    let http = Arc::new(HttpClient::with_timeout(config.http_timeout)?);
    let sdk_config = if config.needs_aws() {
        Some(load_sdk_config(config.aws_region.clone()).await)
    } else {
        None
    };

    let notifier: Arc<dyn Notifier> = match (&config.notifier, &sdk_config) {
        (NotifierConfig::Slack { webhook_url }, _) => {
            Arc::new(SlackNotifier::new(http.clone(), webhook_url))
        }
        (NotifierConfig::Sns { topic_arn }, Some(sdk_config)) => {
            Arc::new(SnsNotifier::from_sdk_config(sdk_config, topic_arn))
        }
        (NotifierConfig::Sns { .. }, None) => {
            return Err(JobError::Config("SNS notifier without AWS configuration".into()));
        }
        (NotifierConfig::Log, _) => Arc::new(LogNotifier),
    };

    let (backend, deleter): (Arc<dyn InventoryBackend>, Arc<dyn Deleter>) = match config.job {
        JobKind::EbsSnapshots => {
            let sdk_config = sdk_config
                .as_ref()
                .ok_or_else(|| JobError::Config("EBS job without AWS configuration".into()))?;
            let backend = Arc::new(EbsSnapshotBackend::from_sdk_config(sdk_config));
            let deleter: Arc<dyn Deleter> = backend.clone();
            (backend as Arc<dyn InventoryBackend>, deleter)
        }
        JobKind::Artifactory => {
            let settings = config
                .artifactory
                .as_ref()
                .ok_or_else(|| JobError::Config("missing Artifactory settings".into()))?;
            let artifactory = ArtifactoryConfig::new(
                &settings.url,
                &settings.repo,
                &settings.username,
                settings.password.clone(),
            )?;
            let backend = Arc::new(ArtifactoryBackend::new(http.clone(), artifactory));
            let deleter: Arc<dyn Deleter> = backend.clone();
            (backend as Arc<dyn InventoryBackend>, deleter)
        }
    };

    Ok(JobParts {
        backend,
        deleter,
        notifier,
    })
}

/// Run one reconciliation with the given collaborators.
pub async fn run_with(config: &JobConfig, parts: JobParts) -> RunOutcome {
    let context = RunContext::new(config.job.as_str());
    info!(
        run_id = %context.run_id,
        job = config.job.as_str(),
        notifier = parts.notifier.notifier_type(),
        "Starting cleanup job"
    );

    let source = InventorySource::with_config(parts.backend, config.inventory.clone());
    let reconciler = Reconciler::new(
        context,
        parts.notifier,
        parts.deleter,
        config.reconciler.clone(),
    );

    reconciler.run(&source, &config.policy()).await
}

/// Build the collaborators and run one reconciliation.
pub async fn run_job(config: &JobConfig) -> Result<RunOutcome, JobError> {
    let parts = build_parts(config).await?;
    Ok(run_with(config, parts).await)
}
