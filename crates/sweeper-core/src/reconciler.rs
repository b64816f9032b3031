// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Notify-then-delete reconciliation.
//!
//! A run proceeds strictly in order:
//!
//! 1. Fetch candidates, then references (reference mode only). A fetch error
//!    aborts the run before anything is sent or deleted.
//! 2. Classify. An empty stale set ends the run quietly.
//! 3. Send one summary naming every stale resource.
//! 4. Delete each stale resource exactly once, recording one outcome per item.
//!    A failed deletion is recorded and the batch continues. Nothing is retried
//!    here; the next scheduled run picks up whatever is still stale.

use std::str::FromStr;
use std::sync::Arc;

use futures::{StreamExt, stream};
use tracing::{Instrument, debug, error, info, warn};

use crate::backend::{Deleter, Notifier};
use crate::classifier::classify;
use crate::context::RunContext;
use crate::error::{ConfigError, ReconcileError};
use crate::inventory::InventorySource;
use crate::model::{DeletionOutcome, ReferenceSet, Resource};
use crate::policy::RetentionPolicy;
use crate::report::{NotificationStatus, RunOutcome, RunResult};

/// What to do when the pre-deletion notification fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationPolicy {
    /// Log the failure and delete anyway.
    #[default]
    FailOpen,
    /// Abort the run before deleting anything.
    FailClosed,
}

impl FromStr for NotificationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-open" | "fail_open" | "open" => Ok(Self::FailOpen),
            "fail-closed" | "fail_closed" | "closed" => Ok(Self::FailClosed),
            other => Err(format!("unknown notification policy: {other}")),
        }
    }
}

/// Subject and preamble of the pre-deletion summary.
#[derive(Debug, Clone)]
pub struct NotificationTemplate {
    /// Message subject.
    pub subject: String,
    /// First line of the body, followed by the stale identifiers.
    pub preamble: String,
}

impl Default for NotificationTemplate {
    fn default() -> Self {
        Self {
            subject: "Stale Resource Cleanup Notification".to_string(),
            preamble: "The following stale resources will be deleted:".to_string(),
        }
    }
}

impl NotificationTemplate {
    /// Render the summary body for the given stale resources.
    pub fn render(&self, stale: &[Resource]) -> String {
        let ids: Vec<&str> = stale.iter().map(|r| r.id.as_str()).collect();
        format!("{}\n{}", self.preamble, ids.join(", "))
    }
}

/// Configuration for the reconciler.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Maximum deletions in flight at once.
    pub max_concurrency: usize,
    /// Behaviour when the pre-deletion notification fails.
    pub notification_policy: NotificationPolicy,
    /// Summary message layout.
    pub template: NotificationTemplate,
    /// Send a notice when a run aborts.
    pub notify_on_abort: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 1, // Sequential by default
            notification_policy: NotificationPolicy::FailOpen,
            template: NotificationTemplate::default(),
            notify_on_abort: false,
        }
    }
}

impl ReconcilerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SWEEPER_MAX_CONCURRENCY`: concurrent deletions, at least 1 (default: 1)
    /// - `SWEEPER_NOTIFICATION_POLICY`: "fail-open" or "fail-closed" (default: fail-open)
    /// - `SWEEPER_NOTIFY_ON_ABORT`: "true"/"1" or "false"/"0" (default: false)
    ///
    /// Unset or empty variables take their defaults; any other unrecognised
    /// value is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_concurrency = match env_value("SWEEPER_MAX_CONCURRENCY") {
            None => 1,
            Some(value) => match value.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid("SWEEPER_MAX_CONCURRENCY", value)),
            },
        };

        let notification_policy = match env_value("SWEEPER_NOTIFICATION_POLICY") {
            None => NotificationPolicy::default(),
            Some(value) => value
                .parse::<NotificationPolicy>()
                .map_err(|_| invalid("SWEEPER_NOTIFICATION_POLICY", value))?,
        };

        let notify_on_abort = match env_value("SWEEPER_NOTIFY_ON_ABORT") {
            None => false,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => return Err(invalid("SWEEPER_NOTIFY_ON_ABORT", value)),
            },
        };

        Ok(Self {
            max_concurrency,
            notification_policy,
            template: NotificationTemplate::default(),
            notify_on_abort,
        })
    }

    /// Set the summary template.
    pub fn with_template(mut self, template: NotificationTemplate) -> Self {
        self.template = template;
        self
    }

    /// Set the deletion concurrency.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Set the notification policy.
    pub fn with_notification_policy(mut self, policy: NotificationPolicy) -> Self {
        self.notification_policy = policy;
        self
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(var: &'static str, value: String) -> ConfigError {
    ConfigError { var, value }
}

/// Orchestrates one notify-then-delete run.
pub struct Reconciler {
    context: RunContext,
    notifier: Arc<dyn Notifier>,
    deleter: Arc<dyn Deleter>,
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Create a new reconciler.
    pub fn new(
        context: RunContext,
        notifier: Arc<dyn Notifier>,
        deleter: Arc<dyn Deleter>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            context,
            notifier,
            deleter,
            config,
        }
    }

    /// Context of the run this reconciler executes.
    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Fetch inventory from `source` and reconcile it.
    pub async fn run(&self, source: &InventorySource, policy: &RetentionPolicy) -> RunOutcome {
        let span = self.context.span();
        async {
            info!(
                backend = source.backend_name(),
                mode = policy.mode(),
                notifier = self.notifier.notifier_type(),
                "Cleanup run started"
            );

            let outcome = match self.fetch_and_reconcile(source, policy).await {
                Ok(result) => RunOutcome::Completed(result),
                Err(e) => {
                    error!(error = %e, "Cleanup run aborted");
                    if self.config.notify_on_abort
                        && !matches!(e, ReconcileError::NotificationRejected(_))
                    {
                        self.announce_abort(&e).await;
                    }
                    RunOutcome::Aborted(e)
                }
            };

            debug!("Cleanup run finished");
            outcome
        }
        .instrument(span)
        .await
    }

    async fn fetch_and_reconcile(
        &self,
        source: &InventorySource,
        policy: &RetentionPolicy,
    ) -> Result<RunResult, ReconcileError> {
        let candidates = source.fetch_candidates().await?;
        let references = if policy.requires_references() {
            source.fetch_references().await?
        } else {
            ReferenceSet::new()
        };

        self.reconcile(&candidates, &references, policy).await
    }

    /// Classify, notify and delete.
    ///
    /// Only fails under [`NotificationPolicy::FailClosed`] when the
    /// notification cannot be delivered.
    pub async fn reconcile(
        &self,
        candidates: &[Resource],
        references: &ReferenceSet,
        policy: &RetentionPolicy,
    ) -> Result<RunResult, ReconcileError> {
        let classification = classify(candidates, references, policy);

        let mut result = RunResult::empty(self.context.run_id);
        result.total_candidates = classification.total();
        result.stale_count = classification.stale.len();
        result.retained_count = classification.retained.len();
        result.warnings = classification.warnings;

        if classification.stale.is_empty() {
            info!(
                total_candidates = result.total_candidates,
                "No stale resources found"
            );
            return Ok(result);
        }

        info!(
            total_candidates = result.total_candidates,
            stale = result.stale_count,
            retained = result.retained_count,
            "Stale resources identified"
        );

        result.notification = self.notify(&classification.stale).await?;

        let outcomes: Vec<DeletionOutcome> = stream::iter(&classification.stale)
            .map(|resource| self.delete_one(resource))
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        result.deleted_count = outcomes.iter().filter(|o| o.succeeded).count();
        result.failed_deletions = outcomes.iter().filter(|o| !o.succeeded).cloned().collect();
        result.outcomes = outcomes;

        Ok(result)
    }

    async fn notify(&self, stale: &[Resource]) -> Result<NotificationStatus, ReconcileError> {
        let body = self.config.template.render(stale);

        match self.notifier.send(&self.config.template.subject, &body).await {
            Ok(()) => {
                info!(
                    notifier = self.notifier.notifier_type(),
                    stale = stale.len(),
                    "Sent notification before deletion"
                );
                Ok(NotificationStatus::Sent)
            }
            Err(e) => match self.config.notification_policy {
                NotificationPolicy::FailOpen => {
                    warn!(
                        notifier = self.notifier.notifier_type(),
                        error = %e,
                        "Notification failed, proceeding with deletion"
                    );
                    Ok(NotificationStatus::Failed(e.to_string()))
                }
                NotificationPolicy::FailClosed => {
                    error!(
                        notifier = self.notifier.notifier_type(),
                        error = %e,
                        "Notification failed, refusing to delete"
                    );
                    Err(ReconcileError::NotificationRejected(e))
                }
            },
        }
    }

    async fn delete_one(&self, resource: &Resource) -> DeletionOutcome {
        let location = resource.location.as_deref().unwrap_or(&resource.id);
        match self.deleter.delete(&resource.id).await {
            Ok(()) => {
                info!(resource_id = %resource.id, location, "Deleted resource");
                DeletionOutcome::deleted(&resource.id)
            }
            Err(e) => {
                error!(resource_id = %resource.id, location, error = %e, "Failed to delete resource");
                DeletionOutcome::failed(&resource.id, e.to_string())
            }
        }
    }

    async fn announce_abort(&self, error: &ReconcileError) {
        let subject = format!("{} Failed", self.config.template.subject);
        let body = format!("Cleanup run {} aborted: {}", self.context.run_id, error);
        if let Err(e) = self.notifier.send(&subject, &body).await {
            warn!(error = %e, "Failed to send abort notification");
        }
    }
}
