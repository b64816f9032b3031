// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! SNS topic notifier.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sns::Client;
use sweeper_core::NotifyError;
use sweeper_core::backend::Notifier;

use super::{describe, is_transport};

/// SNS limits subjects to 100 characters.
const MAX_SUBJECT_CHARS: usize = 100;

/// Publishes notifications to an SNS topic.
#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: Client,
    topic_arn: String,
}

impl SnsNotifier {
    /// Create a notifier for the given topic.
    pub fn new(client: Client, topic_arn: impl Into<String>) -> Self {
        Self {
            client,
            topic_arn: topic_arn.into(),
        }
    }

    /// Create a notifier from the shared AWS configuration.
    pub fn from_sdk_config(config: &SdkConfig, topic_arn: impl Into<String>) -> Self {
        Self::new(Client::new(config), topic_arn)
    }

    /// Target topic ARN.
    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}

fn truncate_subject(subject: &str) -> String {
    subject.chars().take(MAX_SUBJECT_CHARS).collect()
}

#[async_trait]
impl Notifier for SnsNotifier {
    fn notifier_type(&self) -> &'static str {
        "sns"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(truncate_subject(subject))
            .message(body)
            .send()
            .await
            .map_err(|e| {
                if is_transport(&e) {
                    NotifyError::Transport(describe(&e))
                } else {
                    NotifyError::Other(describe(&e))
                }
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_subject() {
        assert_eq!(
            truncate_subject("EBS Snapshot Cleanup Notification"),
            "EBS Snapshot Cleanup Notification"
        );
        let long = "x".repeat(150);
        assert_eq!(truncate_subject(&long).len(), 100);
    }
}
