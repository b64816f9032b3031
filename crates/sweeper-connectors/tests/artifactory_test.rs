// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Artifactory storage API wire behaviour.

use std::sync::Arc;

use sweeper_connectors::{ArtifactoryBackend, ArtifactoryConfig, HttpClient};
use sweeper_core::backend::{Deleter, InventoryBackend};
use sweeper_core::{DeleteError, FetchError, InventorySource, Resource};
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPO: &str = "libs-release-local";

fn backend(server: &MockServer) -> ArtifactoryBackend {
    let config = ArtifactoryConfig::new(
        format!("{}/artifactory", server.uri()),
        REPO,
        "admin",
        Some("secret".to_string()),
    )
    .unwrap();
    ArtifactoryBackend::new(Arc::new(HttpClient::new().unwrap()), config)
}

async fn mount_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/artifactory/api/storage/{REPO}")))
        .and(query_param("deep", "1"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uri": "http://localhost/artifactory/api/storage/libs-release-local",
            "files": [
                {"uri": "/org/app/1.0/app-1.0.jar", "size": 1024, "folder": false},
                {"uri": "/org/app/1.1", "folder": true},
                {"uri": "/org/app/1.1/app-1.1.jar", "size": 2048, "folder": false}
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_info(server: &MockServer, uri: &str, created: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/artifactory/api/storage/{REPO}{uri}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "repo": REPO,
            "path": uri,
            "created": created,
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_skips_folders() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server).await;

    let page = backend(&mock_server).list_candidates_page(None).await.unwrap();

    assert!(page.next_cursor.is_none());
    let ids: Vec<&str> = page.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["/org/app/1.0/app-1.0.jar", "/org/app/1.1/app-1.1.jar"]);
    assert_eq!(
        page.items[0].location.as_deref(),
        Some(format!("{}/artifactory/{REPO}/org/app/1.0/app-1.0.jar", mock_server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_list_failure_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/artifactory/api/storage/{REPO}")))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .mount(&mock_server)
        .await;

    let err = backend(&mock_server)
        .list_candidates_page(None)
        .await
        .unwrap_err();

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Bad credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_describe_reads_created() {
    let mock_server = MockServer::start().await;
    mount_info(&mock_server, "/org/a.jar", "2024-01-15T10:30:00.000Z").await;

    let described = backend(&mock_server)
        .describe(Resource::new("/org/a.jar"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(described.created_at.as_deref(), Some("2024-01-15T10:30:00.000Z"));
}

#[tokio::test]
async fn test_describe_drops_vanished_artifact() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/artifactory/api/storage/{REPO}/org/gone.jar")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let described = backend(&mock_server)
        .describe(Resource::new("/org/gone.jar"))
        .await
        .unwrap();

    assert!(described.is_none());
}

#[tokio::test]
async fn test_describe_server_error_fails_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/artifactory/api/storage/{REPO}/org/a.jar")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = backend(&mock_server)
        .describe(Resource::new("/org/a.jar"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_fetch_candidates_lists_then_describes() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server).await;
    mount_info(&mock_server, "/org/app/1.0/app-1.0.jar", "2020-01-01T00:00:00.000Z").await;
    mount_info(&mock_server, "/org/app/1.1/app-1.1.jar", "2099-01-01T00:00:00.000Z").await;

    let source = InventorySource::new(Arc::new(backend(&mock_server)));
    let candidates = source.fetch_candidates().await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].id, "/org/app/1.0/app-1.0.jar");
    assert_eq!(
        candidates[0].created_at.as_deref(),
        Some("2020-01-01T00:00:00.000Z")
    );
    assert_eq!(
        candidates[1].created_at.as_deref(),
        Some("2099-01-01T00:00:00.000Z")
    );
}

#[tokio::test]
async fn test_delete_targets_repository_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/artifactory/{REPO}/org/a.jar")))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    backend(&mock_server).delete("/org/a.jar").await.unwrap();
}

#[tokio::test]
async fn test_delete_encodes_reserved_characters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/artifactory/{REPO}/org/app%231.0.jar")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    backend(&mock_server).delete("/org/app#1.0.jar").await.unwrap();
}

#[tokio::test]
async fn test_delete_failure_carries_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&mock_server)
        .await;

    let err = backend(&mock_server).delete("/org/a.jar").await.unwrap_err();

    assert!(matches!(err, DeleteError::Status { status: 403, .. }));
}
