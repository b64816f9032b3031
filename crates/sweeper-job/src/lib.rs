// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Sweeper Job - Scheduled Stale-Resource Cleanup
//!
//! A one-shot job meant to be run by a scheduler (cron, Lambda, Kubernetes
//! CronJob). It reads its configuration from the environment, runs a single
//! reconciliation and reports the outcome through its exit code.
//!
//! # Jobs
//!
//! | `SWEEPER_JOB` | Policy | Backend |
//! |---------------|--------|---------|
//! | `ebs-snapshots` | Reference (volume attached to an instance) | EC2 |
//! | `artifactory` | Age (`SWEEPER_RETENTION_DAYS`) | Artifactory storage API |

pub mod config;
pub mod job;

pub use config::{ConfigError, JobConfig, JobKind, NotifierConfig};
pub use job::{JobError, JobParts, build_parts, run_job, run_with};
