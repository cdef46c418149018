//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - outbound HTTP to the remote exam service
//! - [`CredentialsProvider`] - durable access token and cached user

pub mod credentials;
pub mod http;

pub use credentials::{CredentialsError, CredentialsProvider};
pub use http::{Headers, HttpClient, HttpError, Response};
