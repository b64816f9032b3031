// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for sweeper-core.
//!
//! Only [`FetchError`] (and a rejected notification under the fail-closed
//! policy) stops a run. Notification and deletion failures are collected
//! into the run result instead of being propagated.

use thiserror::Error;

/// Inventory or reference enumeration failed. Fatal to the run.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The backend could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with an unexpected status.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// Status code returned by the backend.
        status: u16,
        /// Response body (possibly truncated).
        body: String,
    },

    /// The backend answered with a payload that could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The backend returned a cursor it had already returned.
    #[error("Pagination cursor repeated: {0}")]
    CursorLoop(String),

    /// The listing exceeded the configured page limit.
    #[error("Listing exceeded {0} pages")]
    PageLimit(usize),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Notification delivery failed.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum NotifyError {
    /// The notification endpoint could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The notification endpoint rejected the message.
    #[error("Rejected with status {0}")]
    Rejected(u16),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Deleting a single resource failed.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum DeleteError {
    /// The backend could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with an unexpected status.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// Status code returned by the backend.
        status: u16,
        /// Response body (possibly truncated).
        body: String,
    },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Reasons a run stopped before any deletion.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ReconcileError {
    /// Candidates or references could not be enumerated completely.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Notification failed and the policy does not allow deleting unannounced.
    #[error("Notification failed under fail-closed policy: {0}")]
    NotificationRejected(NotifyError),
}

/// A reconciler setting read from the environment is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for {var}: {value:?}")]
pub struct ConfigError {
    /// Variable name.
    pub var: &'static str,
    /// Offending value.
    pub value: String,
}

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, FetchError>;
