// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Run results and exit status.

use std::process::ExitCode;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::classifier::ClassificationWarning;
use crate::error::ReconcileError;
use crate::model::DeletionOutcome;

/// What happened to the pre-deletion notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum NotificationStatus {
    /// Nothing was stale, so nothing was sent.
    Skipped,
    /// The notifier accepted the summary.
    Sent,
    /// The notifier failed; the reason is kept for the report.
    Failed(String),
}

/// Aggregate result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Run identifier (matches the `run_id` log field).
    pub run_id: Uuid,
    /// Distinct candidates classified.
    pub total_candidates: usize,
    /// Candidates classified as stale.
    pub stale_count: usize,
    /// Candidates retained.
    pub retained_count: usize,
    /// Stale resources deleted successfully.
    pub deleted_count: usize,
    /// Outcomes of failed deletions, in stale order.
    pub failed_deletions: Vec<DeletionOutcome>,
    /// Every deletion outcome, in stale order.
    pub outcomes: Vec<DeletionOutcome>,
    /// Candidates retained because they could not be classified.
    pub warnings: Vec<ClassificationWarning>,
    /// Pre-deletion notification status.
    pub notification: NotificationStatus,
}

impl RunResult {
    /// Result of a run that found nothing to delete.
    pub fn empty(run_id: Uuid) -> Self {
        Self {
            run_id,
            total_candidates: 0,
            stale_count: 0,
            retained_count: 0,
            deleted_count: 0,
            failed_deletions: Vec::new(),
            outcomes: Vec::new(),
            warnings: Vec::new(),
            notification: NotificationStatus::Skipped,
        }
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The run went through classification and deletion.
    Completed(RunResult),
    /// The run stopped before any deletion.
    Aborted(ReconcileError),
}

impl RunOutcome {
    /// The run result, if the run completed.
    pub fn result(&self) -> Option<&RunResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Aborted(_) => None,
        }
    }
}

/// Process-level status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExitStatus {
    /// Everything stale was deleted (or nothing was stale).
    Clean,
    /// The run completed but some deletions failed.
    CompletedWithFailures(usize),
    /// The run stopped before any deletion.
    Aborted,
}

impl RunExitStatus {
    /// Numeric exit code: 0 clean, 1 failures, 2 aborted.
    pub fn code(&self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::CompletedWithFailures(_) => 1,
            Self::Aborted => 2,
        }
    }

    /// Whether a scheduler should consider the run successful.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Clean)
    }
}

impl From<RunExitStatus> for ExitCode {
    fn from(status: RunExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Emit the final summary line and derive the exit status.
pub fn summarize(outcome: &RunOutcome) -> RunExitStatus {
    match outcome {
        RunOutcome::Completed(result) => {
            let failed = result.failed_deletions.len();
            if failed == 0 {
                info!(
                    run_id = %result.run_id,
                    total_candidates = result.total_candidates,
                    stale = result.stale_count,
                    retained = result.retained_count,
                    deleted = result.deleted_count,
                    warnings = result.warnings.len(),
                    "Cleanup completed"
                );
                RunExitStatus::Clean
            } else {
                let failed_ids: Vec<&str> = result
                    .failed_deletions
                    .iter()
                    .map(|o| o.id.as_str())
                    .collect();
                warn!(
                    run_id = %result.run_id,
                    total_candidates = result.total_candidates,
                    stale = result.stale_count,
                    retained = result.retained_count,
                    deleted = result.deleted_count,
                    failed,
                    failed_ids = %failed_ids.join(", "),
                    "Cleanup completed with failures"
                );
                RunExitStatus::CompletedWithFailures(failed)
            }
        }
        RunOutcome::Aborted(e) => {
            error!(error = %e, "Cleanup aborted before any deletion");
            RunExitStatus::Aborted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    #[test]
    fn test_empty_run_is_clean() {
        let outcome = RunOutcome::Completed(RunResult::empty(Uuid::new_v4()));
        let status = summarize(&outcome);
        assert_eq!(status, RunExitStatus::Clean);
        assert_eq!(status.code(), 0);
        assert!(status.is_success());
    }

    #[test]
    fn test_failures_make_exit_non_zero() {
        let mut result = RunResult::empty(Uuid::new_v4());
        result.stale_count = 2;
        result.deleted_count = 1;
        result.outcomes = vec![
            DeletionOutcome::deleted("a"),
            DeletionOutcome::failed("b", "denied"),
        ];
        result.failed_deletions = vec![DeletionOutcome::failed("b", "denied")];

        let status = summarize(&RunOutcome::Completed(result));

        assert_eq!(status, RunExitStatus::CompletedWithFailures(1));
        assert_eq!(status.code(), 1);
    }

    #[test]
    fn test_abort_exit_code() {
        let outcome = RunOutcome::Aborted(ReconcileError::Fetch(FetchError::Transport(
            "connection refused".into(),
        )));
        let status = summarize(&outcome);
        assert_eq!(status, RunExitStatus::Aborted);
        assert_eq!(status.code(), 2);
        assert!(outcome.result().is_none());
    }

    #[test]
    fn test_notification_status_serialization() {
        assert_eq!(
            serde_json::to_value(NotificationStatus::Failed("timeout".into())).unwrap(),
            serde_json::json!({"status": "failed", "reason": "timeout"})
        );
        assert_eq!(
            serde_json::to_value(NotificationStatus::Sent).unwrap(),
            serde_json::json!({"status": "sent"})
        );
    }
}
