//! Authenticated sync client for the remote exam service.
//!
//! - [`SyncClient`] - bearer injection, single-flight renewal, fail-safe logout
//! - [`RequestSpec`] - what to send, relative to the base URL

mod client;
pub mod endpoint;
mod renewal;

pub use client::SyncClient;
pub use endpoint::{Method, RequestSpec, LOGIN_PATH, REFRESH_PATH, REGISTER_PATH};
