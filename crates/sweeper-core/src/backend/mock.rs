// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mock collaborators for testing.
//!
//! [`MockBackend`] simulates a paginated cloud inventory that also deletes:
//! deleted resources stop being listed, so consecutive runs observe the
//! effect of earlier ones. [`MockNotifier`] records every message.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::traits::*;
use crate::error::{DeleteError, FetchError, NotifyError, Result};
use crate::model::Resource;

#[derive(Debug, Default)]
struct MockState {
    candidates: Vec<Resource>,
    references: Vec<String>,
    delete_calls: Vec<String>,
    deleted: Vec<String>,
}

/// Mock inventory backend and deleter.
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
    candidate_pages_served: AtomicUsize,
    reference_pages_served: AtomicUsize,
    describe_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    /// Items per listing page.
    pub page_size: usize,
    /// Zero-based candidate page that fails with a transport error.
    pub fail_candidates_on_page: Option<usize>,
    /// Zero-based reference page that fails with a transport error.
    pub fail_references_on_page: Option<usize>,
    /// Identifiers whose deletion fails.
    pub failing_deletes: HashSet<String>,
    /// Identifiers that disappear between listing and detail lookup.
    pub vanished: HashSet<String>,
    /// Identifiers whose detail lookup fails.
    pub failing_describes: HashSet<String>,
    /// Simulated latency of each deletion (in milliseconds).
    pub delete_delay_ms: u64,
}

impl MockBackend {
    /// Create a mock backend holding the given inventory.
    pub fn new(candidates: Vec<Resource>, references: Vec<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                candidates,
                references,
                ..Default::default()
            })),
            candidate_pages_served: AtomicUsize::new(0),
            reference_pages_served: AtomicUsize::new(0),
            describe_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            page_size: 100,
            fail_candidates_on_page: None,
            fail_references_on_page: None,
            failing_deletes: HashSet::new(),
            vanished: HashSet::new(),
            failing_describes: HashSet::new(),
            delete_delay_ms: 0,
        }
    }

    /// Make deletion of the given identifiers fail.
    pub fn with_failing_deletes<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing_deletes = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Make the given identifiers vanish before their detail lookup.
    pub fn with_vanished<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vanished = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Make detail lookups of the given identifiers fail.
    pub fn with_failing_describes<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing_describes = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the listing page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Fail the given zero-based candidate page.
    pub fn failing_candidates_on_page(mut self, page: usize) -> Self {
        self.fail_candidates_on_page = Some(page);
        self
    }

    /// Fail the given zero-based reference page.
    pub fn failing_references_on_page(mut self, page: usize) -> Self {
        self.fail_references_on_page = Some(page);
        self
    }

    /// Simulate deletion latency.
    pub fn with_delete_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delete_delay_ms = delay_ms;
        self
    }

    /// Identifiers passed to `delete`, in call order.
    pub async fn delete_calls(&self) -> Vec<String> {
        self.state.lock().await.delete_calls.clone()
    }

    /// Identifiers successfully deleted, in completion order.
    pub async fn deleted(&self) -> Vec<String> {
        self.state.lock().await.deleted.clone()
    }

    /// Identifiers still present in the inventory.
    pub async fn remaining(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.candidates.iter().map(|r| r.id.clone()).collect()
    }

    /// Number of candidate pages served so far.
    pub fn candidate_pages_served(&self) -> usize {
        self.candidate_pages_served.load(Ordering::SeqCst)
    }

    /// Number of reference pages served so far.
    pub fn reference_pages_served(&self) -> usize {
        self.reference_pages_served.load(Ordering::SeqCst)
    }

    /// Number of detail lookups performed so far.
    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    /// Highest number of deletions observed running at the same time.
    pub fn max_concurrent_deletes(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn page_of<T: Clone>(&self, items: &[T], cursor: Option<&str>) -> Result<(usize, Page<T>)> {
        let index = match cursor {
            None => 0,
            Some(c) => c
                .trim_start_matches("page-")
                .parse::<usize>()
                .map_err(|e| FetchError::Other(format!("bad cursor {c}: {e}")))?,
        };
        let page_size = self.page_size.max(1);
        let start = (index * page_size).min(items.len());
        let end = (start + page_size).min(items.len());
        let chunk = items[start..end].to_vec();

        let page = if end < items.len() {
            Page::with_next(chunk, format!("page-{}", index + 1))
        } else {
            Page::last(chunk)
        };
        Ok((index, page))
    }
}

#[async_trait]
impl InventoryBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_candidates_page(&self, cursor: Option<&str>) -> Result<Page<Resource>> {
        let state = self.state.lock().await;
        let (index, page) = self.page_of(&state.candidates, cursor)?;
        if self.fail_candidates_on_page == Some(index) {
            return Err(FetchError::Transport(format!(
                "mock candidate page {index} unavailable"
            )));
        }
        self.candidate_pages_served.fetch_add(1, Ordering::SeqCst);
        Ok(page)
    }

    async fn list_references_page(&self, cursor: Option<&str>) -> Result<Page<String>> {
        let state = self.state.lock().await;
        let (index, page) = self.page_of(&state.references, cursor)?;
        if self.fail_references_on_page == Some(index) {
            return Err(FetchError::Transport(format!(
                "mock reference page {index} unavailable"
            )));
        }
        self.reference_pages_served.fetch_add(1, Ordering::SeqCst);
        Ok(page)
    }

    async fn describe(&self, resource: Resource) -> Result<Option<Resource>> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_describes.contains(&resource.id) {
            return Err(FetchError::Status {
                status: 500,
                body: format!("mock detail lookup failed for {}", resource.id),
            });
        }
        if self.vanished.contains(&resource.id) {
            return Ok(None);
        }
        Ok(Some(resource))
    }
}

#[async_trait]
impl Deleter for MockBackend {
    async fn delete(&self, id: &str) -> std::result::Result<(), DeleteError> {
        self.state.lock().await.delete_calls.push(id.to_string());

        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        if self.delete_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delete_delay_ms)).await;
        }

        let result = if self.failing_deletes.contains(id) {
            Err(DeleteError::Other(format!("mock delete failure for {id}")))
        } else {
            let mut state = self.state.lock().await;
            state.candidates.retain(|r| r.id != id);
            state.deleted.push(id.to_string());
            Ok(())
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Mock notifier that records messages.
#[derive(Default)]
pub struct MockNotifier {
    messages: Arc<Mutex<Vec<(String, String)>>>,
    /// If true, every send fails after being recorded.
    pub fail: bool,
}

impl MockNotifier {
    /// Create a notifier that accepts every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notifier whose sends always fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Recorded `(subject, body)` pairs, in send order.
    pub async fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn notifier_type(&self) -> &'static str {
        "mock"
    }

    async fn send(&self, subject: &str, body: &str) -> std::result::Result<(), NotifyError> {
        self.messages
            .lock()
            .await
            .push((subject.to_string(), body.to_string()));
        if self.fail {
            return Err(NotifyError::Rejected(503));
        }
        Ok(())
    }
}
