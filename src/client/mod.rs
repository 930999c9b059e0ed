//! HTTP request executor for the SoftSync API
//!
//! Every call goes to `<base_url>/api/<endpoint>` with a JSON content type
//! and, when asked for, the session's bearer token. The outcome is either the
//! decoded response (status matched) or a [`RequestFailure`] whose `Display`
//! is the human-readable detail recorded in the test report.

#[cfg(test)]
pub(crate) mod fake;
mod transport;

pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportError};

use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::common::Result;

/// A request description, independent of session state
#[derive(Debug, Clone)]
pub struct ApiCall {
    pub method: Method,
    pub endpoint: String,
    pub payload: Option<Value>,
    pub expected_status: u16,
    pub use_auth: bool,
}

impl ApiCall {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            payload: None,
            expected_status: 200,
            use_auth: false,
        }
    }

    /// Build a call from a method name, rejecting unknown methods up front
    pub fn parse(method: &str, endpoint: impl Into<String>) -> std::result::Result<Self, RequestFailure> {
        Method::parse(method)
            .map(|m| Self::new(m, endpoint))
            .ok_or_else(|| RequestFailure::unsupported_method(method))
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>, payload: Value) -> Self {
        Self::new(Method::Post, endpoint).with_payload(payload)
    }

    pub fn put(endpoint: impl Into<String>, payload: Value) -> Self {
        Self::new(Method::Put, endpoint).with_payload(payload)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Delete, endpoint)
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attach the session bearer token when one is available
    pub fn authed(mut self) -> Self {
        self.use_auth = true;
        self
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }
}

/// A response whose status code matched the expectation
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body, or the raw text as a JSON string when it isn't JSON
    pub body: Value,
}

/// Why a request did not produce the expected response
#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    UnsupportedMethod(String),
    StatusMismatch { expected: u16, actual: u16, body: Value },
    Timeout,
    Connection,
    Other(String),
}

/// A failed request; `Display` yields the recorded detail text
#[derive(Debug, Clone, PartialEq)]
pub struct RequestFailure {
    pub kind: FailureKind,
}

impl RequestFailure {
    pub fn unsupported_method(method: &str) -> Self {
        Self {
            kind: FailureKind::UnsupportedMethod(method.to_string()),
        }
    }

    /// Detail string as stored in the test report
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FailureKind::UnsupportedMethod(method) => write!(f, "Unsupported method: {method}"),
            FailureKind::StatusMismatch {
                expected,
                actual,
                body,
            } => write!(
                f,
                "Expected {expected}, got {actual}. Response: {}",
                render_body(body)
            ),
            FailureKind::Timeout => write!(f, "Request timeout"),
            FailureKind::Connection => write!(f, "Connection error"),
            FailureKind::Other(message) => write!(f, "Request error: {message}"),
        }
    }
}

impl From<TransportError> for RequestFailure {
    fn from(e: TransportError) -> Self {
        let kind = match e {
            TransportError::Timeout => FailureKind::Timeout,
            TransportError::Connection => FailureKind::Connection,
            TransportError::Other(message) => FailureKind::Other(message),
        };
        Self { kind }
    }
}

/// Outcome of a single executed call
pub type RequestOutcome = std::result::Result<ApiResponse, RequestFailure>;

/// Render a response body for failure details: strings verbatim, JSON compact
///
/// Objects render as serialized JSON (`{"detail":"down"}`), never in Python
/// dict notation (`{'detail': 'down'}`). Golden comparisons against reports
/// that used dict notation must normalise one side.
pub fn render_body(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Decode a response body, falling back to the raw text
pub fn decode_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Stateless executor bound to one deployment
pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl ApiClient {
    /// Client using the real HTTP stack
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self::with_transport(base_url, ReqwestTransport::new(timeout)?))
    }

    pub fn with_transport(base_url: &str, transport: impl Transport + 'static) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport: Box::new(transport),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint under the `/api/` prefix
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Execute a call, attaching `token` when the call asks for auth
    pub async fn execute(&self, call: &ApiCall, token: Option<&str>) -> RequestOutcome {
        let mut headers = vec![("Content-Type", "application/json".to_string())];
        if call.use_auth {
            if let Some(token) = token {
                headers.push(("Authorization", format!("Bearer {token}")));
            }
        }

        let request = HttpRequest {
            method: call.method,
            url: self.url_for(&call.endpoint),
            headers,
            body: if call.method.carries_body() {
                call.payload.clone()
            } else {
                None
            },
        };

        tracing::debug!(method = %request.method, url = %request.url, "Sending request");

        let response = self.transport.send(request).await.map_err(|e| {
            let failure = RequestFailure::from(e);
            tracing::warn!(endpoint = %call.endpoint, error = %failure, "Request failed");
            failure
        })?;

        let body = decode_body(&response.body);

        if response.status != call.expected_status {
            tracing::warn!(
                endpoint = %call.endpoint,
                expected = call.expected_status,
                actual = response.status,
                "Unexpected status"
            );
            return Err(RequestFailure {
                kind: FailureKind::StatusMismatch {
                    expected: call.expected_status,
                    actual: response.status,
                    body,
                },
            });
        }

        Ok(ApiResponse {
            status: response.status,
            body,
        })
    }
}
