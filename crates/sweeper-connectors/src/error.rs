// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for connector construction.
//!
//! Errors raised while talking to a remote system are reported through the
//! core error types ([`FetchError`], [`NotifyError`], [`DeleteError`]); this
//! module only covers failures while building a connector.

use sweeper_core::{DeleteError, FetchError, NotifyError};
use thiserror::Error;

/// Errors that can occur while building a connector.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConnectorError {
    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// A required setting is missing or malformed.
    #[error("Invalid connector configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for connector construction.
pub type Result<T> = std::result::Result<T, ConnectorError>;

pub(crate) fn fetch_transport(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_decode() {
        FetchError::Decode(format!("{url}: {err}"))
    } else {
        FetchError::Transport(format!("{url}: {err}"))
    }
}

pub(crate) fn notify_transport(err: reqwest::Error) -> NotifyError {
    NotifyError::Transport(err.to_string())
}

pub(crate) fn delete_transport(url: &str, err: reqwest::Error) -> DeleteError {
    DeleteError::Transport(format!("{url}: {err}"))
}
