// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Complete enumeration of candidates and references.
//!
//! Fetching happens in two phases:
//!
//! 1. **List**: pages are requested from the backend until it stops returning
//!    a cursor. Any failed page fails the whole listing.
//! 2. **Detail**: each listed candidate is described, with bounded
//!    concurrency. Results keep listing order; any failure fails the fetch.
//!
//! Nothing is handed to the classifier until both phases have completed, so a
//! partial reference set can never make a live resource look orphaned.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, info, warn};

use crate::backend::{InventoryBackend, Page};
use crate::error::{FetchError, Result};
use crate::model::{ReferenceSet, Resource};

/// Configuration for an [`InventorySource`].
#[derive(Debug, Clone)]
pub struct InventorySourceConfig {
    /// Maximum pages per listing before giving up.
    pub max_pages: usize,
    /// Maximum concurrent detail lookups.
    pub detail_concurrency: usize,
}

impl Default for InventorySourceConfig {
    fn default() -> Self {
        Self {
            max_pages: 10_000,
            detail_concurrency: 8,
        }
    }
}

/// Fetches complete candidate and reference sets from a backend.
pub struct InventorySource {
    backend: Arc<dyn InventoryBackend>,
    config: InventorySourceConfig,
}

impl InventorySource {
    /// Create a source with default configuration.
    pub fn new(backend: Arc<dyn InventoryBackend>) -> Self {
        Self::with_config(backend, InventorySourceConfig::default())
    }

    /// Create a source with explicit configuration.
    pub fn with_config(backend: Arc<dyn InventoryBackend>, config: InventorySourceConfig) -> Self {
        Self { backend, config }
    }

    /// Name of the underlying backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Enumerate every candidate, including per-item details.
    ///
    /// Candidates that vanish between listing and detail lookup are dropped.
    /// Duplicate identifiers are collapsed, keeping the first occurrence.
    pub async fn fetch_candidates(&self) -> Result<Vec<Resource>> {
        let backend = &self.backend;
        let listed = self
            .drain_pages("candidates", |cursor| async move {
                backend.list_candidates_page(cursor.as_deref()).await
            })
            .await?;
        let listed_count = listed.len();

        let described: Vec<Option<Resource>> = stream::iter(listed)
            .map(|resource| backend.describe(resource))
            .buffered(self.config.detail_concurrency.max(1))
            .try_collect()
            .await
            .inspect_err(|e| {
                warn!(backend = backend.name(), error = %e, "Candidate detail lookup failed");
            })?;

        let mut seen = HashSet::with_capacity(described.len());
        let candidates: Vec<Resource> = described
            .into_iter()
            .flatten()
            .filter(|r| seen.insert(r.id.clone()))
            .collect();

        info!(
            backend = backend.name(),
            listed = listed_count,
            candidates = candidates.len(),
            "Fetched candidates"
        );

        Ok(candidates)
    }

    /// Enumerate every reference identifier.
    pub async fn fetch_references(&self) -> Result<ReferenceSet> {
        let backend = &self.backend;
        let references: ReferenceSet = self
            .drain_pages("references", |cursor| async move {
                backend.list_references_page(cursor.as_deref()).await
            })
            .await?
            .into_iter()
            .collect();

        info!(
            backend = backend.name(),
            references = references.len(),
            "Fetched references"
        );

        Ok(references)
    }

    /// Request pages until the backend stops returning a cursor.
    async fn drain_pages<T, F, Fut>(&self, listing: &'static str, mut fetch: F) -> Result<Vec<T>>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors = HashSet::new();
        let mut pages = 0usize;

        loop {
            if pages >= self.config.max_pages {
                warn!(listing, pages, "Listing exceeded page limit");
                return Err(FetchError::PageLimit(self.config.max_pages));
            }

            let page = fetch(cursor.take()).await.inspect_err(|e| {
                warn!(listing, page = pages, error = %e, "Failed to fetch page");
            })?;
            pages += 1;
            items.extend(page.items);

            match page.next_cursor {
                None => break,
                Some(next) => {
                    if !seen_cursors.insert(next.clone()) {
                        warn!(listing, cursor = %next, "Backend repeated a pagination cursor");
                        return Err(FetchError::CursorLoop(next));
                    }
                    cursor = Some(next);
                }
            }
        }

        debug!(listing, pages, items = items.len(), "Listing complete");
        Ok(items)
    }
}
