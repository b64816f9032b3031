// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Slack incoming-webhook notifier.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use sweeper_core::NotifyError;
use sweeper_core::backend::Notifier;
use tracing::{debug, error};

use crate::error::notify_transport;
use crate::http::HttpClient;

#[derive(Debug, Serialize)]
struct SlackMessage {
    text: String,
}

/// Posts notifications to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    http: Arc<HttpClient>,
    webhook_url: String,
}

impl SlackNotifier {
    /// Create a notifier for the given webhook URL.
    pub fn new(http: Arc<HttpClient>, webhook_url: impl Into<String>) -> Self {
        Self {
            http,
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn notifier_type(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = SlackMessage {
            text: format!("*{subject}*\n{body}"),
        };

        debug!("Sending Slack notification");
        let response = self
            .http
            .client()
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await
            .map_err(notify_transport)?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "Slack webhook rejected the notification");
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}
