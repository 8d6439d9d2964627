//! HTTP transport for page and detail fetches.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::HarvestError;

/// A transport capable of issuing one GET against a composed URL and handing
/// back the parsed JSON body.
///
/// The transport performs exactly one request per call: no sleeping, no
/// retrying. Tests inject a scripted implementation (see
/// [`crate::harvest::mock`]) instead of hitting the network.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Fetch the URL and return the response body as parsed JSON.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, HarvestError>;
}

/// [`Transport`] implementation over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
}

impl HttpTransport {
    /// Create a transport with default settings.
    pub fn new() -> Result<Self, HarvestError> {
        Self::with_user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
    }

    /// Create a transport with a custom user agent.
    pub fn with_user_agent(user_agent: &str) -> Result<Self, HarvestError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| HarvestError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create from an existing reqwest client.
    pub fn from_client(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, HarvestError> {
        let url = Url::parse(url)
            .map_err(|e| HarvestError::Transport(format!("invalid URL {}: {}", url, e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HarvestError::Transport(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Api(format!(
                "upstream returned status {}",
                status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| HarvestError::Transport(format!("failed to read body: {}", e)))?;

        if body.is_empty() {
            return Err(HarvestError::EmptyResponse);
        }

        let json = serde_json::from_slice(&body)?;

        Ok(json)
    }
}
