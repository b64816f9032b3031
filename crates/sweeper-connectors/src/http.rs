// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shared HTTP client handle.

use std::time::Duration;

use crate::error::Result;

/// HTTP client owned by one job.
///
/// Wrap it in an `Arc` and hand it to every HTTP collaborator of the job; the
/// connection pool is released when the last reference is dropped.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Request timeout applied when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Build a client with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Build a client with a per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sweeper/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { inner, timeout })
    }

    /// The underlying reqwest client.
    pub fn client(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Configured per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Read a response body for error reporting, tolerating read failures.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let http = HttpClient::new().unwrap();
        assert_eq!(http.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_custom_timeout() {
        let http = HttpClient::with_timeout(Duration::from_millis(250)).unwrap();
        assert_eq!(http.timeout(), Duration::from_millis(250));
    }
}
