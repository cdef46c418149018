//! Mock implementations for test fixtures.
//!
//! Re-exports the doubles from `prepexam::adapters::mock` and adds scripted
//! response helpers.

pub use prepexam::adapters::mock::{InMemoryCredentials, MockHttpClient, MockResponse};
pub use prepexam::traits::{HttpError, Response};

use serde_json::Value;

/// JSON response with the given status.
pub fn json(status: u16, body: Value) -> MockResponse {
    MockResponse::Success(Response::json_body(status, &body))
}

/// Transport failure with no response.
#[allow(dead_code)]
pub fn offline() -> MockResponse {
    MockResponse::Error(HttpError::ConnectionFailed("connection refused".to_string()))
}

/// Configuration for setting up mock HTTP responses.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Fixed JSON response for a URL.
    pub fn with_json_response(self, url: &str, status: u16, body: Value) -> Self {
        self.client.set_response(url, json(status, body));
        self
    }

    /// Default response for unmatched URLs.
    pub fn with_default_success(self) -> Self {
        self.client
            .set_default_response(json(200, serde_json::json!({"success": true})));
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}
