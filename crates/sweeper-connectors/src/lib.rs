// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Sweeper Connectors
//!
//! Concrete collaborators for the reconciliation engine in `sweeper-core`.
//!
//! | Collaborator | Role | Transport |
//! |--------------|------|-----------|
//! | [`ArtifactoryBackend`] | Inventory + deleter (age mode) | HTTP storage API |
//! | [`EbsSnapshotBackend`] | Inventory + deleter (reference mode) | EC2 API |
//! | [`SlackNotifier`] | Notifier | Incoming webhook |
//! | [`SnsNotifier`] | Notifier | SNS `Publish` |
//!
//! HTTP collaborators of one job share a single [`HttpClient`].

pub mod artifactory;
pub mod aws;
pub mod error;
pub mod http;
pub mod slack;

pub use artifactory::{ArtifactoryBackend, ArtifactoryConfig};
pub use aws::{EbsSnapshotBackend, SnsNotifier, load_sdk_config};
pub use error::{ConnectorError, Result};
pub use http::HttpClient;
pub use slack::SlackNotifier;
