// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Collaborator trait definitions.
//!
//! Defines the abstract interfaces the reconciler consumes: an inventory
//! backend to enumerate candidates and references, a notifier and a deleter.

use async_trait::async_trait;

use crate::error::{DeleteError, NotifyError, Result};
use crate::model::Resource;

/// One page of a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Cursor for the next page, `None` on the last page.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A final page.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    /// A page followed by more pages.
    pub fn with_next(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            items,
            next_cursor: Some(cursor.into()),
        }
    }
}

/// Trait for inventory backends.
///
/// Backends expose raw pages. They do not decide when a listing is complete;
/// [`InventorySource`](crate::inventory::InventorySource) drives pagination
/// and only hands complete sets to the classifier.
#[async_trait]
pub trait InventoryBackend: Send + Sync {
    /// Backend identifier used in log fields (e.g. "ebs", "artifactory").
    fn name(&self) -> &str;

    /// Fetch one page of candidate resources.
    async fn list_candidates_page(&self, cursor: Option<&str>) -> Result<Page<Resource>>;

    /// Fetch one page of reference identifiers.
    async fn list_references_page(&self, cursor: Option<&str>) -> Result<Page<String>>;

    /// Fetch per-item details for a listed candidate.
    ///
    /// Returns `Ok(None)` if the resource disappeared between listing and
    /// detail lookup. The default implementation returns the listed resource.
    async fn describe(&self, resource: Resource) -> Result<Option<Resource>> {
        Ok(Some(resource))
    }
}

/// Trait for notification channels.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifier type identifier (e.g. "slack", "sns", "log").
    fn notifier_type(&self) -> &'static str;

    /// Deliver a message.
    async fn send(&self, subject: &str, body: &str) -> std::result::Result<(), NotifyError>;
}

/// Trait for resource deleters.
#[async_trait]
pub trait Deleter: Send + Sync {
    /// Delete a single resource by identifier.
    async fn delete(&self, id: &str) -> std::result::Result<(), DeleteError>;
}
