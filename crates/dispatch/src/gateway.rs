//! Push gateway client.
//!
//! [`HttpPushGateway`] submits batches of push messages to the external
//! gateway's bulk-send endpoint in a single HTTP POST per sub-batch. The
//! gateway's response body is best-effort and is not inspected for
//! per-message receipts: a successful call means the delivery attempt was
//! accepted, not that every device received it.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

/// HTTP request timeout for a single bulk-send call. A timed-out call
/// fails the whole sub-batch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// PushMessage
// ---------------------------------------------------------------------------

/// One push message addressed to a single device token.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    /// Device token addressing the recipient at the gateway.
    pub to: String,
    pub title: String,
    pub body: String,
    /// Deep-link route opened when the push is tapped.
    pub route: String,
    /// Producer metadata passed through opaquely.
    pub data: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for gateway submission failures.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("push gateway returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// PushGateway
// ---------------------------------------------------------------------------

/// Outbound push seam used by the drain cycle and mention fan-out.
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Submit one sub-batch in a single gateway call. Any failure fails
    /// the whole sub-batch; the caller decides what stays queued.
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<(), GatewayError>;
}

/// HTTP implementation against the gateway's bulk-send endpoint.
///
/// Cheap to clone; the underlying HTTP client is shared.
#[derive(Clone)]
pub struct HttpPushGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpPushGateway {
    /// Create a gateway client with a pre-configured HTTP client.
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Build the client from `PUSH_GATEWAY_URL` and optional
    /// `PUSH_GATEWAY_KEY` environment variables.
    pub fn from_env() -> Self {
        let endpoint = std::env::var("PUSH_GATEWAY_URL").expect("PUSH_GATEWAY_URL must be set");
        let api_key = std::env::var("PUSH_GATEWAY_KEY").ok();
        Self::new(endpoint, api_key)
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<(), GatewayError> {
        let mut request = self.client.post(&self.endpoint).json(&messages);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
