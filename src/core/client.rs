//! HTTP client for the Rebillia REST API.
//!
//! The dispatch layer talks to the upstream through the [`ApiTransport`]
//! trait so service functions can be exercised against a recording fake in
//! tests. [`RebilliaClient`] is the real reqwest-backed implementation.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Default production endpoint. Override with `REBILLIA_API_URL`.
pub const DEFAULT_BASE_URL: &str = "https://api.rebillia.com/v1";

/// Errors raised by the transport layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The upstream returned a non-success HTTP status. The message embeds
    /// the numeric status, the status text, and the response body so callers
    /// get everything the upstream said in one string.
    #[error("Rebillia API error ({status} {status_text}): {body}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("invalid JSON response: {0}")]
    Decode(String),
}

/// One authenticated request against the upstream API.
///
/// Implementations attach the `X-AUTH-TOKEN` header and JSON content type,
/// resolve `path` against the configured base URL, and surface non-success
/// statuses as [`ApiError::Status`]. No retries, no caching.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, ApiError>;
    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError>;
    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError>;
    async fn delete(&self, path: &str) -> Result<Value, ApiError>;
}

/// reqwest-backed client for the Rebillia Public API.
pub struct RebilliaClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl RebilliaClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "sending upstream request");

        let mut request = self
            .http
            .request(method, &url)
            .header("X-AUTH-TOKEN", &self.api_key)
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            // Some endpoints (deletes in particular) reply with no body.
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ApiTransport for RebilliaClient {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(reqwest::Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.send(reqwest::Method::POST, path, body).await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.send(reqwest::Method::PUT, path, body).await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(reqwest::Method::DELETE, path, None).await
    }
}

#[cfg(test)]
pub mod testing {
    //! Recording fake transport shared by service and handler tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// One request captured by [`FakeTransport`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        pub method: &'static str,
        pub path: String,
        pub body: Option<Value>,
    }

    /// In-memory transport that records every call and replays canned
    /// responses in order. When the queue is empty it answers `{}`.
    #[derive(Default)]
    pub struct FakeTransport {
        calls: Mutex<Vec<RecordedCall>>,
        responses: Mutex<VecDeque<Result<Value, ApiError>>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fake answering `response` to the next call.
        pub fn replying(response: Value) -> Self {
            let fake = Self::new();
            fake.push_ok(response);
            fake
        }

        /// Fake failing the next call with an HTTP status error.
        pub fn failing(status: u16, status_text: &str, body: &str) -> Self {
            let fake = Self::new();
            fake.push_err(ApiError::Status {
                status,
                status_text: status_text.to_string(),
                body: body.to_string(),
            });
            fake
        }

        pub fn push_ok(&self, response: Value) {
            self.responses.lock().unwrap().push_back(Ok(response));
        }

        pub fn push_err(&self, error: ApiError) {
            self.responses.lock().unwrap().push_back(Err(error));
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        /// Path of the only recorded call. Panics if there is not exactly one.
        pub fn single_call(&self) -> RecordedCall {
            let calls = self.calls();
            assert_eq!(calls.len(), 1, "expected exactly one upstream call");
            calls.into_iter().next().unwrap()
        }

        fn record(
            &self,
            method: &'static str,
            path: &str,
            body: Option<Value>,
        ) -> Result<Value, ApiError> {
            self.calls.lock().unwrap().push(RecordedCall {
                method,
                path: path.to_string(),
                body,
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Value::Object(Map::new())))
        }
    }

    #[async_trait]
    impl ApiTransport for FakeTransport {
        async fn get(&self, path: &str) -> Result<Value, ApiError> {
            self.record("GET", path, None)
        }

        async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
            self.record("POST", path, body)
        }

        async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
            self.record("PUT", path, body)
        }

        async fn delete(&self, path: &str) -> Result<Value, ApiError> {
            self.record("DELETE", path, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_embeds_status_and_body() {
        let err = ApiError::Status {
            status: 404,
            status_text: "Not Found".to_string(),
            body: r#"{"error":"Not found"}"#.to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("Not Found"));
        assert!(message.contains(r#"{"error":"Not found"}"#));
    }

    #[tokio::test]
    async fn fake_transport_records_calls_in_order() {
        use testing::FakeTransport;

        let fake = FakeTransport::new();
        fake.push_ok(serde_json::json!({"id": 1}));
        let first = fake.get("/customers/1").await.unwrap();
        assert_eq!(first["id"], 1);

        // Queue exhausted: defaults to an empty object.
        let second = fake.delete("/customers/1").await.unwrap();
        assert_eq!(second, serde_json::json!({}));

        let calls = fake.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "GET");
        assert_eq!(calls[1].method, "DELETE");
    }
}
