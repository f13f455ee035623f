//! HTTP transport to the device's web server.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument, trace};

use crate::api::Request;
use crate::Result;

/// What the device answered, whatever the status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests against the device.
///
/// Implementations resolve to the device's reply for any status and fail
/// only when no reply arrives. They never retry.
pub trait Transport: Send + Sync {
    fn get(&self, request: &Request) -> impl Future<Output = Result<Response>> + Send;
}

/// Where the device lives and how long to wait for it
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Base URL of the device, e.g. `http://192.168.4.1`
    pub base_url: String,
    /// Per-request timeout; `None` waits as long as the connection lives
    pub timeout: Option<Duration>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.4.1".to_string(),
            timeout: None,
        }
    }
}

/// reqwest-backed transport. Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: DeviceConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        debug!("Using device at {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    #[instrument(skip_all, fields(uri = %request.uri()))]
    async fn get(&self, request: &Request) -> Result<Response> {
        // Query is pre-encoded the way a browser encodes a typed URL
        let url = format!("{}{}", self.base_url, request.encoded_uri());
        trace!("Sending request");

        let response = self.client.get(&url).send().await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "Device responded");

        Ok(Response { status, body })
    }
}
