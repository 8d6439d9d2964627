//! The paginated fetch-and-aggregate engine.
//!
//! This module is catalog-agnostic: it knows how to compose a query string,
//! issue a GET through an injected [`Transport`], walk a paginated result set
//! while honoring a record cap and an inter-page rate-limit pause, and resolve
//! a single detail record. The ComicVine-specific request shapes and mappers
//! live in [`crate::comicvine`].

pub mod mock;
mod pager;
mod query;
mod transport;

pub use pager::{fetch_detail, harvest_pages, DetailEnvelope, PageEnvelope};
pub use query::QuerySpec;
pub use transport::{HttpTransport, Transport};

use std::time::Duration;

use tokio::sync::watch;

/// Errors that can occur during a harvest.
///
/// A single failed page or child fetch aborts the entire harvest; there is no
/// partial-success return path.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// Required setup (API key, subject, etc.) was absent before any network call
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// The underlying request errored or timed out
    #[error("transport failure: {0}")]
    Transport(String),

    /// The upstream API answered with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// The transport succeeded but yielded no usable body
    #[error("empty response from upstream")]
    EmptyResponse,

    /// Mapping found a required field missing from an upstream record
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The inter-page rate-limit pause was interrupted
    #[error("harvest cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for HarvestError {
    fn from(err: reqwest::Error) -> Self {
        HarvestError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for HarvestError {
    fn from(err: serde_json::Error) -> Self {
        tracing::debug!("response body failed to deserialize: {}", err);
        HarvestError::EmptyResponse
    }
}

/// Cancellation token for an in-flight harvest.
///
/// Cancellation is delivered at the inter-page rate-limit pause; an in-progress
/// HTTP call is not interrupted mid-flight. Clones observe the same signal, and
/// the flag stays set so the surrounding process can also react to it.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: std::sync::Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Create a new, uncancelled token.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
            rx,
        }
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleep for the configured inter-page delay, aborting early with
/// [`HarvestError::Cancelled`] if the token fires.
pub async fn pause(delay: Duration, cancel: &CancelToken) -> Result<(), HarvestError> {
    let mut rx = cancel.rx.clone();
    if *rx.borrow_and_update() {
        return Err(HarvestError::Cancelled);
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        res = rx.wait_for(|cancelled| *cancelled) => {
            // The sender lives inside the token, so the channel cannot close
            // while `cancel` is borrowed; Err is unreachable here.
            match res {
                Ok(_) => Err(HarvestError::Cancelled),
                Err(_) => Ok(()),
            }
        }
    }
}
