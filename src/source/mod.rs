//! Index retrieval from local paths and raw-file URLs.
//!
//! The published index lives on a plain static host (a raw-content CDN);
//! there is no API in front of it. This module is the only place the core
//! touches the network for index data: it fetches raw text, and loading
//! stays a pure function of that text.

use crate::constants::{HTTP_TIMEOUT, USER_AGENT};
use crate::core::WorkshopError;
use crate::index::{DuplicateIdPolicy, IndexDocument};
use std::path::Path;

/// Whether a location string names a remote index rather than a local file.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetch the raw index text from a local path or an `http(s)` URL.
///
/// # Errors
///
/// [`WorkshopError::FetchError`] for transport failures and non-2xx
/// responses, [`WorkshopError::IndexNotFound`] for a missing local file.
pub async fn fetch_index(location: &str) -> Result<String, WorkshopError> {
    if is_remote(location) {
        return fetch_remote(location).await;
    }

    let path = Path::new(location);
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WorkshopError::IndexNotFound { path: location.to_string() }
        } else {
            WorkshopError::IoError(e)
        }
    })
}

/// Fetch and parse the index in one step.
///
/// # Errors
///
/// Fetch errors from [`fetch_index`] plus the format errors documented on
/// [`IndexDocument::parse_with_policy`].
pub async fn load_index(
    location: &str,
    policy: DuplicateIdPolicy,
) -> Result<IndexDocument, WorkshopError> {
    let content = fetch_index(location).await?;
    IndexDocument::parse_with_policy(&content, location, policy)
}

async fn fetch_remote(url: &str) -> Result<String, WorkshopError> {
    tracing::debug!(url, "fetching index");

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()?;

    let response = client.get(url).send().await.map_err(|e| WorkshopError::FetchError {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(WorkshopError::FetchError {
            url: url.to_string(),
            reason: format!("server returned HTTP {status}"),
        });
    }

    response.text().await.map_err(|e| WorkshopError::FetchError {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
