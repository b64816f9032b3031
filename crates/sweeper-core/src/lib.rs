// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Sweeper Core - Stale-Resource Reconciliation
//!
//! This crate decides *what* to delete and sequences the deletion safely. It
//! is shared by the snapshot cleanup (reference-based) and the artifact
//! retention (age-based) jobs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐    ┌────────────────────┐    ┌──────────┐    ┌────────────┐    ┌──────────┐
//! │ InventorySource  │───►│ Classifier (pure)  │───►│ Notifier │───►│ Reconciler │───►│ Reporter │
//! │ list → describe  │    │ stale / retained   │    │ summary  │    │ delete loop│    │ exit code│
//! └──────────────────┘    └────────────────────┘    └──────────┘    └────────────┘    └──────────┘
//!          ▲                                             ▲                 │
//!          │ InventoryBackend                            │ Notifier        │ Deleter
//!          └──────────── cloud / artifact repository ────┴─────────────────┘
//! ```
//!
//! # Failure Model
//!
//! | Error | Effect |
//! |-------|--------|
//! | [`FetchError`](error::FetchError) | Run aborts before any notification or deletion |
//! | [`ClassificationWarning`](classifier::ClassificationWarning) | Item retained, warning logged |
//! | [`NotifyError`](error::NotifyError) | Logged; deletion proceeds unless fail-closed |
//! | [`DeleteError`](error::DeleteError) | Recorded per item; batch continues |
//!
//! # Exit Status
//!
//! | Code | Meaning |
//! |------|---------|
//! | `0` | Clean (including nothing to delete) |
//! | `1` | Completed with failed deletions |
//! | `2` | Aborted before any deletion |
//!
//! # Modules
//!
//! - [`backend`]: Collaborator traits and mock implementations
//! - [`classifier`]: Stale/retained partition
//! - [`context`]: Per-run logging context
//! - [`error`]: Error types
//! - [`inventory`]: Complete, paginated enumeration
//! - [`model`]: Resources and outcomes
//! - [`policy`]: Retention policies
//! - [`reconciler`]: Notify-then-delete orchestration
//! - [`report`]: Run results and exit status

#![deny(missing_docs)]

/// Inventory, notification and deletion collaborators.
pub mod backend;

/// Reachability classification.
pub mod classifier;

/// Per-run observability context.
pub mod context;

/// Error types for reconciliation.
pub mod error;

/// Two-phase inventory enumeration.
pub mod inventory;

/// Resources, reference sets and deletion outcomes.
pub mod model;

/// Retention policies.
pub mod policy;

/// Notify-then-delete orchestration.
pub mod reconciler;

/// Run results and exit status.
pub mod report;

pub use context::RunContext;
pub use error::{ConfigError, DeleteError, FetchError, NotifyError, ReconcileError};
pub use inventory::InventorySource;
pub use model::{DeletionOutcome, ReferenceSet, Resource};
pub use policy::RetentionPolicy;
pub use reconciler::{NotificationPolicy, NotificationTemplate, Reconciler, ReconcilerConfig};
pub use report::{RunExitStatus, RunOutcome, RunResult, summarize};
