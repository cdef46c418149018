//! Concrete implementations of the trait abstractions in `crate::traits`.
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//! - [`FileCredentialsProvider`] - JSON file credential store
//!
//! The [`mock`] submodule holds the test doubles.

pub mod file_credentials;
pub mod mock;
pub mod reqwest_http;

pub use file_credentials::FileCredentialsProvider;
pub use mock::{InMemoryCredentials, MockHttpClient, MockResponse, RecordedRequest};
pub use reqwest_http::ReqwestHttpClient;
