use futures::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Status line and body text of a webhook reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// No usable reply arrived: DNS, refused connection, timeout, broken body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Webhook request failed: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

pub type TransportFuture = BoxFuture<'static, Result<RawResponse, TransportError>>;

/// Performs the single outbound POST of a booking attempt.
pub trait WebhookTransport: Send + Sync {
    fn post_json(&self, url: &str, payload: &Value) -> TransportFuture;
}

/// Client for the clinic's booking webhook
#[derive(Debug, Clone, Default)]
pub struct BookingWebhookClient {
    client: Client,
}

impl BookingWebhookClient {
    /// Create a client that relies on the transport's default timeouts
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a client that gives up on a request after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl WebhookTransport for BookingWebhookClient {
    fn post_json(&self, url: &str, payload: &Value) -> TransportFuture {
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload);
        let url = url.to_string();

        Box::pin(async move {
            info!("Posting booking request to webhook");
            debug!("Webhook URL: {}", url);

            let res = request.send().await.map_err(|err| {
                warn!("Booking webhook unreachable: {}", err);
                TransportError::from(err)
            })?;
            let status = res.status().as_u16();
            info!("Response received with status: {}", status);

            let body = res.text().await?;
            debug!("Webhook response body is {} bytes", body.len());

            Ok(RawResponse { status, body })
        })
    }
}
