// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-run observability context.

use tracing::Span;
use uuid::Uuid;

/// Identity of one run, attached to every log line it produces.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Unique identifier of this run.
    pub run_id: Uuid,
    /// Job name (e.g. "ebs-snapshots").
    pub job: String,
}

impl RunContext {
    /// Create a context with a fresh run ID.
    pub fn new(job: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            job: job.into(),
        }
    }

    /// Span that scopes all events of this run.
    pub fn span(&self) -> Span {
        tracing::info_span!("reconcile", run_id = %self.run_id, job = %self.job)
    }
}
