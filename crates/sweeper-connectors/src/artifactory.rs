// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Artifactory repository backend for age-based retention.
//!
//! Listing uses the storage API with a deep file list (one response, no
//! paging). Each listed file is then looked up individually to read its
//! `created` timestamp; a file that is gone by then (404) is dropped from the
//! candidates. Any other failure fails the fetch.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use sweeper_core::backend::{Deleter, InventoryBackend, Page};
use sweeper_core::error::Result;
use sweeper_core::{DeleteError, FetchError, Resource};
use tracing::{debug, info, warn};

use crate::error::{ConnectorError, delete_transport, fetch_transport};
use crate::http::{HttpClient, error_body};

/// Connection settings for one Artifactory repository.
#[derive(Debug, Clone)]
pub struct ArtifactoryConfig {
    /// Base URL, e.g. `https://artifactory.example.com/artifactory`.
    pub base_url: String,
    /// Repository key, e.g. `libs-release-local`.
    pub repo: String,
    /// Basic-auth user.
    pub username: String,
    /// Basic-auth password or API key.
    pub password: Option<String>,
}

impl ArtifactoryConfig {
    /// Create settings, normalising slashes on the URL and repository key.
    pub fn new(
        base_url: impl Into<String>,
        repo: impl Into<String>,
        username: impl Into<String>,
        password: Option<String>,
    ) -> std::result::Result<Self, ConnectorError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let repo = repo.into().trim_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConnectorError::InvalidConfig(
                "Artifactory base URL is empty".into(),
            ));
        }
        if repo.is_empty() {
            return Err(ConnectorError::InvalidConfig(
                "Artifactory repository is empty".into(),
            ));
        }
        Ok(Self {
            base_url,
            repo,
            username: username.into(),
            password,
        })
    }

    fn list_url(&self) -> String {
        format!("{}/api/storage/{}?list&deep=1", self.base_url, self.repo)
    }

    fn info_url(&self, uri: &str) -> String {
        format!("{}/api/storage/{}{}", self.base_url, self.repo, encode_path(uri))
    }

    fn artifact_url(&self, uri: &str) -> String {
        format!("{}/{}{}", self.base_url, self.repo, encode_path(uri))
    }
}

/// Percent-encode each segment of a repository path, keeping the separators.
fn encode_path(uri: &str) -> String {
    uri.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileListEntry>,
}

#[derive(Debug, Deserialize)]
struct FileListEntry {
    uri: Option<String>,
    #[serde(default)]
    folder: bool,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    created: Option<String>,
}

/// Inventory backend and deleter for one Artifactory repository.
///
/// Candidate IDs are repository-relative URIs (`/org/app/1.0/app.jar`).
#[derive(Debug, Clone)]
pub struct ArtifactoryBackend {
    http: Arc<HttpClient>,
    config: ArtifactoryConfig,
}

impl ArtifactoryBackend {
    /// Create a backend sharing the job's HTTP client.
    pub fn new(http: Arc<HttpClient>, config: ArtifactoryConfig) -> Self {
        Self { http, config }
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .client()
            .request(method, url)
            .basic_auth(&self.config.username, self.config.password.as_deref())
    }
}

#[async_trait]
impl InventoryBackend for ArtifactoryBackend {
    fn name(&self) -> &str {
        "artifactory"
    }

    async fn list_candidates_page(&self, _cursor: Option<&str>) -> Result<Page<Resource>> {
        let url = self.config.list_url();
        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| fetch_transport(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }

        let listing: FileList = response.json().await.map_err(|e| fetch_transport(&url, e))?;

        let items: Vec<Resource> = listing
            .files
            .into_iter()
            .filter(|entry| !entry.folder)
            .filter_map(|entry| entry.uri)
            .map(|uri| {
                let location = self.config.artifact_url(&uri);
                Resource::new(uri).with_location(location)
            })
            .collect();

        info!(repo = %self.config.repo, files = items.len(), "Listed repository files");
        Ok(Page::last(items))
    }

    async fn list_references_page(&self, _cursor: Option<&str>) -> Result<Page<String>> {
        // Artifacts are retained by age alone.
        Ok(Page::last(Vec::new()))
    }

    async fn describe(&self, resource: Resource) -> Result<Option<Resource>> {
        let url = self.config.info_url(&resource.id);
        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| fetch_transport(&url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!(uri = %resource.id, "Artifact disappeared before its details were read");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }

        let info: FileInfo = response.json().await.map_err(|e| fetch_transport(&url, e))?;
        debug!(uri = %resource.id, created = ?info.created, "Read artifact details");

        Ok(Some(match info.created {
            Some(created) => resource.with_created_at(created),
            None => resource,
        }))
    }
}

#[async_trait]
impl Deleter for ArtifactoryBackend {
    async fn delete(&self, id: &str) -> std::result::Result<(), DeleteError> {
        let url = self.config.artifact_url(id);
        let response = self
            .request(reqwest::Method::DELETE, &url)
            .send()
            .await
            .map_err(|e| delete_transport(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeleteError::Status {
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }
        Ok(())
    }
}
