//! Request descriptions handed to the sync client.

use serde::Serialize;
use serde_json::Value;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const REFRESH_PATH: &str = "/refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// One outbound call, relative to the client's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    /// POST with any serializable body.
    pub fn post_json<T: Serialize>(
        path: impl Into<String>,
        body: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::post(path, serde_json::to_value(body)?))
    }

    /// Login, registration and renewal itself never go through renewal.
    pub fn bypasses_renewal(&self) -> bool {
        let path = self.path.split('?').next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        [LOGIN_PATH, REGISTER_PATH, REFRESH_PATH]
            .iter()
            .any(|p| path == *p || path.ends_with(p))
    }

    pub(crate) fn body_string(&self) -> String {
        self.body
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| "{}".to_string())
    }
}
