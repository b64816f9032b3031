// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reachability classification.
//!
//! Partitions candidates into stale and retained sets. No I/O happens here;
//! the only per-item failure is an unreadable creation time, which keeps the
//! item and records a [`ClassificationWarning`].

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{ReferenceSet, Resource};
use crate::policy::RetentionPolicy;

/// A candidate that could not be classified with confidence and was retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationWarning {
    /// Identifier of the retained resource.
    pub id: String,
    /// Why the resource could not be classified.
    pub reason: String,
}

/// Partition of the candidate set.
#[derive(Debug, Clone, Default)]
pub struct ClassificationResult {
    /// Stale resources, in input order.
    pub stale: Vec<Resource>,
    /// Resources to keep.
    pub retained: HashSet<Resource>,
    /// Resources retained because their attributes were ambiguous.
    pub warnings: Vec<ClassificationWarning>,
}

impl ClassificationResult {
    /// Number of distinct candidates classified.
    pub fn total(&self) -> usize {
        self.stale.len() + self.retained.len()
    }
}

/// Classify candidates against the current time.
pub fn classify(
    candidates: &[Resource],
    references: &ReferenceSet,
    policy: &RetentionPolicy,
) -> ClassificationResult {
    classify_at(candidates, references, policy, Utc::now())
}

/// Classify candidates against a fixed `now`.
///
/// Candidates sharing an identifier are the same entity; only the first
/// occurrence is classified.
pub fn classify_at(
    candidates: &[Resource],
    references: &ReferenceSet,
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
) -> ClassificationResult {
    let cutoff = policy.cutoff(now);
    let mut result = ClassificationResult::default();
    let mut seen = HashSet::with_capacity(candidates.len());

    for candidate in candidates {
        if !seen.insert(candidate.id.as_str()) {
            debug!(resource_id = %candidate.id, "Skipping duplicate candidate");
            continue;
        }

        let stale = match (policy, cutoff) {
            (RetentionPolicy::Reference, _) => match &candidate.parent_ref {
                Some(parent) => !references.contains(parent),
                None => true,
            },
            (RetentionPolicy::Age { .. }, Some(cutoff)) => {
                match candidate.created_at.as_deref().map(parse_timestamp) {
                    Some(Some(created)) => created < cutoff,
                    Some(None) => {
                        result.warnings.push(ambiguous(candidate, "unparseable createdAt"));
                        false
                    }
                    None => {
                        result.warnings.push(ambiguous(candidate, "missing createdAt"));
                        false
                    }
                }
            }
            (RetentionPolicy::Age { .. }, None) => false,
        };

        if stale {
            result.stale.push(candidate.clone());
        } else {
            result.retained.insert(candidate.clone());
        }
    }

    debug!(
        mode = policy.mode(),
        stale = result.stale.len(),
        retained = result.retained.len(),
        warnings = result.warnings.len(),
        "Classification complete"
    );

    result
}

fn ambiguous(candidate: &Resource, reason: &str) -> ClassificationWarning {
    warn!(
        resource_id = %candidate.id,
        created_at = candidate.created_at.as_deref().unwrap_or(""),
        reason,
        "Retaining resource with ambiguous creation time"
    );
    ClassificationWarning {
        id: candidate.id.clone(),
        reason: reason.to_string(),
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`2024-01-01T10:00:00.000Z`), offsets without a colon
/// (`2024-01-01T10:00:00.000+0200`) and naive timestamps, which are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
