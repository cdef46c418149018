//! Mock HTTP client for testing.
//!
//! Responses can be fixed per URL, queued for one use each, computed from
//! the incoming request, or delayed to widen race windows.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

impl RecordedRequest {
    /// The bearer token sent with this request, if any.
    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get("Authorization")
            .and_then(|v| v.strip_prefix("Bearer "))
    }

    /// Parse the body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Fail without a response
    Error(HttpError),
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

/// Mock HTTP client for testing.
///
/// Lookup order for a URL: queued one-shot responses, a responder
/// function, a fixed response (exact, then prefix match), the default.
/// Clones share all state.
#[derive(Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    queued: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    responders: Arc<Mutex<HashMap<String, Responder>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed response for a URL (exact or prefix match).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Queue a response used once, before any fixed response for the URL.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        self.queued
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Compute responses for a URL from the request itself.
    pub fn set_responder<F>(&self, url: &str, responder: F)
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        self.responders
            .lock()
            .unwrap()
            .insert(url.to_string(), Arc::new(responder));
    }

    /// Sleep before answering requests to a URL.
    pub fn set_delay(&self, url: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests whose URL ends with `suffix`.
    pub fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.ends_with(suffix))
            .cloned()
            .collect()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, request: RecordedRequest) {
        self.requests.lock().unwrap().push(request);
    }

    fn get_response(&self, request: &RecordedRequest) -> Option<MockResponse> {
        let url = request.url.as_str();

        if let Some(queue) = self.queued.lock().unwrap().get_mut(url) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }

        let responder = self.responders.lock().unwrap().get(url).cloned();
        if let Some(responder) = responder {
            return Some(responder(request));
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }
        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }
        drop(responses);

        self.default_response.lock().unwrap().clone()
    }

    async fn respond(&self, request: RecordedRequest) -> Result<Response, HttpError> {
        self.record_request(request.clone());

        let delay = self.delays.lock().unwrap().get(&request.url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.get_response(&request) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for URL: {}",
                request.url
            ))),
        }
    }
}

impl fmt::Debug for MockHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockHttpClient")
            .field("requests", &self.requests.lock().unwrap().len())
            .finish()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.respond(RecordedRequest {
            method: "GET".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: None,
        })
        .await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.respond(RecordedRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: Some(body.to_string()),
        })
        .await
    }
}
