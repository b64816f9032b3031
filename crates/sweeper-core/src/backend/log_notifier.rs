// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Notifier that writes to the log.

use async_trait::async_trait;
use tracing::info;

use super::traits::Notifier;
use crate::error::NotifyError;

/// Notifier used when no delivery channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn notifier_type(&self) -> &'static str {
        "log"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        info!(subject, body, "Notification");
        Ok(())
    }
}
