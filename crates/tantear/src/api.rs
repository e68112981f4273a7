//! Black-box HTTP API checks against an echo/status service.
//!
//! Independent request/assert pairs, unrelated in data flow to the UI
//! components. The client is blocking, matching the rest of the suite, and
//! measures elapsed wall-clock time per request. There is no retry or
//! backoff: a failing assertion is the terminal outcome.

use crate::result::{TantearError, TantearResult};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound a healthy endpoint must answer within.
pub const RESPONSE_TIME_BUDGET: Duration = Duration::from_secs(5);

/// Per-request transport timeout, above the budget so slow responses are
/// measured instead of aborted.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking client for API checks.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Client pointing at the given base URL.
    ///
    /// # Errors
    ///
    /// Propagates TLS/client construction failures.
    pub fn new(base_url: impl Into<String>) -> TantearResult<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// The base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a path.
    ///
    /// # Errors
    ///
    /// Transport failures map to [`TantearError::Http`].
    pub fn get(&self, path: &str) -> TantearResult<ApiResponse> {
        self.execute(self.http.get(self.url(path)))
    }

    /// GET a path with query parameters.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub fn get_with_query(&self, path: &str, query: &[(&str, &str)]) -> TantearResult<ApiResponse> {
        self.execute(self.http.get(self.url(path)).query(query))
    }

    /// POST a JSON body to a path.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub fn post_json(&self, path: &str, body: &Value) -> TantearResult<ApiResponse> {
        self.execute(self.http.post(self.url(path)).json(body))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn execute(&self, request: reqwest::blocking::RequestBuilder) -> TantearResult<ApiResponse> {
        let start = Instant::now();
        let response = request.send()?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text()?;
        let elapsed = start.elapsed();
        debug!(status, ?elapsed, "api check response");

        Ok(ApiResponse {
            status,
            content_type,
            body: serde_json::from_str(&text).ok(),
            elapsed,
        })
    }
}

/// Everything an API check asserts on: status, content type, parsed JSON
/// body, elapsed time.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header, if present
    pub content_type: Option<String>,
    /// Response body parsed as JSON, if it was JSON
    pub body: Option<Value>,
    /// Wall-clock round-trip time
    pub elapsed: Duration,
}

impl ApiResponse {
    /// The JSON body.
    ///
    /// # Errors
    ///
    /// [`TantearError::ExternalService`] when the body was absent or not JSON.
    pub fn json(&self) -> TantearResult<&Value> {
        self.body.as_ref().ok_or_else(|| TantearError::ExternalService {
            message: "response body was not JSON".to_string(),
        })
    }

    /// Assert the exact status code.
    ///
    /// # Errors
    ///
    /// [`TantearError::Assertion`] on mismatch.
    pub fn expect_status(&self, expected: u16) -> TantearResult<&Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(TantearError::assertion(format!(
                "expected status {expected}, got {}",
                self.status
            )))
        }
    }

    /// Assert the content type contains a fragment (e.g. `application/json`).
    ///
    /// # Errors
    ///
    /// [`TantearError::Assertion`] when missing or mismatched.
    pub fn expect_content_type(&self, fragment: &str) -> TantearResult<&Self> {
        match &self.content_type {
            Some(value) if value.contains(fragment) => Ok(self),
            Some(value) => Err(TantearError::assertion(format!(
                "expected content type containing '{fragment}', got '{value}'"
            ))),
            None => Err(TantearError::assertion(format!(
                "expected content type containing '{fragment}', header missing"
            ))),
        }
    }

    /// Assert the round trip stayed under a budget.
    ///
    /// # Errors
    ///
    /// [`TantearError::Assertion`] when the budget was exceeded.
    pub fn expect_elapsed_under(&self, budget: Duration) -> TantearResult<&Self> {
        if self.elapsed < budget {
            Ok(self)
        } else {
            Err(TantearError::assertion(format!(
                "response took {:?}, budget is {budget:?}",
                self.elapsed
            )))
        }
    }
}
