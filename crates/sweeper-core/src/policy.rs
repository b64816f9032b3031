// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Retention policies.

use chrono::{DateTime, Duration, Utc};

/// How a run decides whether a candidate is still wanted.
///
/// Exactly one policy is active per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// A candidate is live while its `parent_ref` is in the reference set.
    Reference,
    /// A candidate is live while it is younger than `max_age`.
    Age {
        /// Maximum age before a candidate expires.
        max_age: Duration,
    },
}

impl RetentionPolicy {
    /// Age-based policy expressed in days.
    pub fn age_days(days: u32) -> Self {
        Self::Age {
            max_age: Duration::days(i64::from(days)),
        }
    }

    /// Whether this policy consults a reference set.
    ///
    /// Age-based runs skip the reference fetch entirely.
    pub fn requires_references(&self) -> bool {
        matches!(self, Self::Reference)
    }

    /// Cutoff instant for age-based policies: anything created strictly
    /// before it is expired.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Reference => None,
            Self::Age { max_age } => Some(now - *max_age),
        }
    }

    /// Short name used in log fields.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Age { .. } => "age",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_references() {
        assert!(RetentionPolicy::Reference.requires_references());
        assert!(!RetentionPolicy::age_days(30).requires_references());
    }

    #[test]
    fn test_cutoff() {
        let now = Utc::now();
        assert_eq!(RetentionPolicy::Reference.cutoff(now), None);
        assert_eq!(
            RetentionPolicy::age_days(30).cutoff(now),
            Some(now - Duration::days(30))
        );
    }
}
