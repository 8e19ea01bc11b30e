//! Request capability the search core talks to.
//!
//! The core never sees transport errors as panics or exceptions: every
//! request resolves to a [`FetchOutcome`].

use crate::shared::search::CancelHandle;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {status}")]
    Http { status: u16 },
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result of one request: data, cancellation, or failure
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Ok(T),
    /// The request was aborted; not an error
    Cancelled,
    Failed(FetchError),
}

/// `GET url` returning a JSON body.
///
/// `cancel`, when given, may be signalled while the request is in flight;
/// implementations should abort and resolve to [`FetchOutcome::Cancelled`].
#[async_trait(?Send)]
pub trait Transport {
    async fn get_json(&self, url: &str, cancel: Option<&CancelHandle>) -> FetchOutcome<Value>;
}
