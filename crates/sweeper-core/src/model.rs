// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Resources, reference sets and per-item results.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A candidate resource (snapshot, artifact, ...).
///
/// Identity is the identifier alone: two resources with the same `id` compare
/// equal and hash identically regardless of their attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Opaque identifier understood by the deleter.
    pub id: String,
    /// Anchor this resource depends on (e.g. the volume a snapshot was taken from).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<String>,
    /// Creation timestamp as reported by the backend, unparsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Human-readable location used in log lines (e.g. an artifact URI).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Resource {
    /// Create a resource with no attributes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_ref: None,
            created_at: None,
            location: None,
        }
    }

    /// Set the parent reference.
    pub fn with_parent(mut self, parent_ref: impl Into<String>) -> Self {
        self.parent_ref = Some(parent_ref.into());
        self
    }

    /// Set the raw creation timestamp.
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Set the display location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Identifiers that are still in active use.
pub type ReferenceSet = HashSet<String>;

/// Result of attempting to delete one stale resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionOutcome {
    /// Identifier of the resource.
    pub id: String,
    /// Whether the deleter reported success.
    pub succeeded: bool,
    /// Error detail from a failed deletion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeletionOutcome {
    /// Outcome of a successful deletion.
    pub fn deleted(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            succeeded: true,
            error: None,
        }
    }

    /// Outcome of a failed deletion.
    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            succeeded: false,
            error: Some(error.into()),
        }
    }
}
