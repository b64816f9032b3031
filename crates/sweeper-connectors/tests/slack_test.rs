// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Slack webhook wire behaviour.

use std::sync::Arc;
use std::time::Duration;

use sweeper_connectors::{HttpClient, SlackNotifier};
use sweeper_core::NotifyError;
use sweeper_core::backend::Notifier;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> Arc<HttpClient> {
    Arc::new(HttpClient::new().unwrap())
}

#[tokio::test]
async fn test_posts_subject_and_body_as_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/T000/B000/XXX"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "text": "*Cleanup*\nThe following stale resources will be deleted:\nsnap-1, snap-2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = SlackNotifier::new(
        http(),
        format!("{}/services/T000/B000/XXX", mock_server.uri()),
    );

    notifier
        .send(
            "Cleanup",
            "The following stale resources will be deleted:\nsnap-1, snap-2",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_non_success_status_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("invalid_token"))
        .mount(&mock_server)
        .await;

    let notifier = SlackNotifier::new(http(), mock_server.uri());
    let err = notifier.send("s", "b").await.unwrap_err();

    assert!(matches!(err, NotifyError::Rejected(403)));
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let http = Arc::new(HttpClient::with_timeout(Duration::from_millis(200)).unwrap());
    let notifier = SlackNotifier::new(http, mock_server.uri());
    let err = notifier.send("s", "b").await.unwrap_err();

    assert!(matches!(err, NotifyError::Transport(_)));
}
