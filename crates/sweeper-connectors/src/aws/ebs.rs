// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! EBS snapshot backend for reference-based cleanup.
//!
//! Candidates are the snapshots owned by the account; a snapshot's parent is
//! the volume it was taken from. References are the volumes currently attached
//! to any instance, so a snapshot is stale when its source volume is no longer
//! attached anywhere (or it has no source volume at all).

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ec2::Client;
use aws_sdk_ec2::types::{Reservation, Snapshot};
use sweeper_core::backend::{Deleter, InventoryBackend, Page};
use sweeper_core::error::Result;
use sweeper_core::{DeleteError, FetchError, Resource};
use tracing::{debug, warn};

use super::{describe, is_transport};

const PAGE_SIZE: i32 = 1000;

/// Convert a described snapshot into a candidate.
///
/// Returns `None` for entries without a snapshot ID.
pub fn snapshot_to_resource(snapshot: &Snapshot) -> Option<Resource> {
    let id = snapshot.snapshot_id()?;
    let mut resource = Resource::new(id);

    if let Some(volume_id) = snapshot.volume_id() {
        resource = resource.with_parent(volume_id);
    }
    if let Some(started) = snapshot
        .start_time()
        .and_then(|t| chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
    {
        resource = resource.with_created_at(started.to_rfc3339());
    }
    Some(resource)
}

/// Volume IDs attached to the instances in `reservations`.
pub fn attached_volume_ids(reservations: &[Reservation]) -> Vec<String> {
    reservations
        .iter()
        .flat_map(|reservation| reservation.instances())
        .flat_map(|instance| instance.block_device_mappings())
        .filter_map(|mapping| mapping.ebs())
        .filter_map(|ebs| ebs.volume_id())
        .map(str::to_string)
        .collect()
}

/// Snapshot inventory and deleter for the current AWS account.
#[derive(Debug, Clone)]
pub struct EbsSnapshotBackend {
    client: Client,
}

impl EbsSnapshotBackend {
    /// Create a backend from an EC2 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a backend from the shared AWS configuration.
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl InventoryBackend for EbsSnapshotBackend {
    fn name(&self) -> &str {
        "ebs-snapshots"
    }

    async fn list_candidates_page(&self, cursor: Option<&str>) -> Result<Page<Resource>> {
        let output = self
            .client
            .describe_snapshots()
            .owner_ids("self")
            .max_results(PAGE_SIZE)
            .set_next_token(cursor.map(str::to_string))
            .send()
            .await
            .map_err(|e| {
                if is_transport(&e) {
                    FetchError::Transport(describe(&e))
                } else {
                    FetchError::Other(describe(&e))
                }
            })?;

        let snapshots = output.snapshots();
        let items: Vec<Resource> = snapshots.iter().filter_map(snapshot_to_resource).collect();
        if items.len() != snapshots.len() {
            warn!(
                skipped = snapshots.len() - items.len(),
                "Skipped snapshots without an ID"
            );
        }
        debug!(snapshots = items.len(), "Fetched snapshot page");

        Ok(Page {
            items,
            next_cursor: output.next_token().map(str::to_string),
        })
    }

    async fn list_references_page(&self, cursor: Option<&str>) -> Result<Page<String>> {
        let output = self
            .client
            .describe_instances()
            .max_results(PAGE_SIZE)
            .set_next_token(cursor.map(str::to_string))
            .send()
            .await
            .map_err(|e| {
                if is_transport(&e) {
                    FetchError::Transport(describe(&e))
                } else {
                    FetchError::Other(describe(&e))
                }
            })?;

        let items = attached_volume_ids(output.reservations());
        debug!(volumes = items.len(), "Fetched attached volume page");

        Ok(Page {
            items,
            next_cursor: output.next_token().map(str::to_string),
        })
    }
}

#[async_trait]
impl Deleter for EbsSnapshotBackend {
    async fn delete(&self, id: &str) -> std::result::Result<(), DeleteError> {
        self.client
            .delete_snapshot()
            .snapshot_id(id)
            .send()
            .await
            .map_err(|e| {
                if is_transport(&e) {
                    DeleteError::Transport(describe(&e))
                } else {
                    DeleteError::Other(describe(&e))
                }
            })?;
        Ok(())
    }
}
