//! Reqwest-backed [`HttpClient`].

use async_trait::async_trait;
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// HTTP transport over a shared `reqwest::Client`.
///
/// Non-2xx statuses come back as `Ok(Response)`; only transport failures
/// map to [`HttpError`].
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map(Self::with_client)
            .map_err(|e| HttpError::Other(e.to_string()))
    }

    /// Wrap a preconfigured `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else if err.is_body() || err.is_decode() {
            HttpError::Io(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        headers
            .iter()
            .fold(builder, |builder, (key, value)| builder.header(key, value))
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Response, HttpError> {
        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, headers, body))
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let builder = Self::apply_headers(self.client.get(url), headers);
        self.send(builder).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        let builder = Self::apply_headers(self.client.post(url).body(body.to_string()), headers);
        self.send(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_with_timeout_builds() {
        let client = ReqwestHttpClient::with_timeout(Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_convert_headers() {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );

        let headers = ReqwestHttpClient::convert_headers(&header_map);
        assert_eq!(
            headers.get("content-type"),
            Some(&"application/json".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_ok_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exam-attempts"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({"message": "expired"})),
            )
            .mount(&server)
            .await;

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "Bearer abc".to_string());
        let response = ReqwestHttpClient::new()
            .get(&format!("{}/exam-attempts", server.uri()), &headers)
            .await
            .unwrap();

        assert_eq!(response.status, 401);
        assert_eq!(response.error_message().as_deref(), Some("expired"));
    }

    #[tokio::test]
    async fn test_post_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(serde_json::json!({"email": "a@b.c"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let response = ReqwestHttpClient::new()
            .post(
                &format!("{}/login", server.uri()),
                r#"{"email":"a@b.c"}"#,
                &Headers::new(),
            )
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.text().unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_get_connection_refused() {
        let result = ReqwestHttpClient::new()
            .get("http://127.0.0.1:59999/test", &Headers::new())
            .await;
        assert!(matches!(
            result,
            Err(HttpError::ConnectionFailed(_)) | Err(HttpError::Other(_))
        ));
    }

    #[tokio::test]
    async fn test_get_invalid_url() {
        let result = ReqwestHttpClient::new()
            .get("not-a-valid-url", &Headers::new())
            .await;
        assert!(result.is_err());
    }
}
