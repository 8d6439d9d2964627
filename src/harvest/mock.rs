//! Scripted transport for testing purposes.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{HarvestError, Transport};

/// A [`Transport`] that replays queued responses and records every requested
/// URL, so tests can drive the harvest loop without a network.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<serde_json::Value, HarvestError>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    /// Create a transport with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON response.
    pub fn push_json(&self, body: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: HarvestError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// The URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, HarvestError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(HarvestError::EmptyResponse))
    }
}
