use mockall::mock;
use serde_json::Value;

use crate::client::{RawResponse, TransportError, TransportFuture, WebhookTransport};

// Define a mock transport for the booking webhook
mock! {
    pub WebhookTransport {}

    impl WebhookTransport for WebhookTransport {
        fn post_json(&self, url: &str, payload: &Value) -> TransportFuture;
    }
}

// Future resolving to the given webhook reply
pub fn reply(status: u16, body: &str) -> TransportFuture {
    let response = RawResponse::new(status, body);
    Box::pin(async move { Ok(response) })
}

// Future resolving to a transport failure
pub fn unreachable() -> TransportFuture {
    Box::pin(async { Err(TransportError::new("connection refused")) })
}

// Helper function to set up a mock transport that answers every request once
pub fn setup_mock_transport(status: u16, body: &str) -> MockWebhookTransport {
    let body = body.to_string();
    let mut transport = MockWebhookTransport::new();
    transport
        .expect_post_json()
        .times(1)
        .returning(move |_, _| reply(status, &body));
    transport
}

// Helper function to set up a mock transport whose single request never connects
pub fn setup_failing_transport() -> MockWebhookTransport {
    let mut transport = MockWebhookTransport::new();
    transport
        .expect_post_json()
        .times(1)
        .returning(|_, _| unreachable());
    transport
}
