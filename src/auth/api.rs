//! Wire types for the account endpoints.

use serde::{Deserialize, Deserializer, Serialize};

use super::credentials::CachedUser;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from `POST /login` and `POST /register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPayload,
}

/// Response from `POST /refresh`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<UserPayload> for CachedUser {
    fn from(user: UserPayload) -> Self {
        CachedUser {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Ids arrive as numbers from some deployments and strings from others.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
