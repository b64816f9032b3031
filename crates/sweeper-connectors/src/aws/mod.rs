// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! AWS collaborators: EBS snapshot inventory and SNS notifications.

mod ebs;
mod sns;

pub use ebs::{EbsSnapshotBackend, attached_volume_ids, snapshot_to_resource};
pub use sns::SnsNotifier;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ec2::error::{DisplayErrorContext, SdkError};

/// Load the shared AWS configuration from the environment.
///
/// Credentials and region follow the default provider chain; `region`
/// overrides the region when set.
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }
    loader.load().await
}

/// Whether the request never produced a service response.
pub(crate) fn is_transport<E, R>(err: &SdkError<E, R>) -> bool {
    matches!(
        err,
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)
    )
}

/// Full error chain of an SDK error, including the service error code.
pub(crate) fn describe<E, R>(err: &SdkError<E, R>) -> String
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    DisplayErrorContext(err).to_string()
}
