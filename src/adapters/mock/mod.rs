//! Test doubles for the trait abstractions.
//!
//! - [`MockHttpClient`] - scripted HTTP responses
//! - [`InMemoryCredentials`] - in-memory credential store

pub mod credentials;
pub mod http;

pub use credentials::InMemoryCredentials;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
