//! Inbound webhook envelopes and outbound provider API request types.

use std::collections::HashMap;
use std::time::Duration;

use jiff::Timestamp;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::{Error, ErrorKind, Result};

/// The raw HTTP envelope of an inbound webhook, as received by the ingress
/// handler before it is handed to a provider adapter's `processWebhook` step.
///
/// Headers are captured case-insensitively and the body is kept as raw bytes
/// so that signature verification can run over the exact bytes the sender
/// signed, ahead of any JSON parsing.
#[derive(Debug, Clone)]
pub struct WebhookEnvelope {
    /// HTTP method used for the request (almost always `POST`).
    pub method: String,
    /// The path the webhook was received on, e.g. `/hooks/<uuid>`.
    pub path: String,
    /// Request headers, with lowercase keys.
    pub headers: HashMap<String, String>,
    /// Query string parameters.
    pub query: HashMap<String, String>,
    /// Raw request body.
    pub body: Vec<u8>,
    /// When the envelope was received.
    pub received_at: Timestamp,
}

impl WebhookEnvelope {
    /// Creates a new envelope, lowercasing header names for case-insensitive lookup.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        headers: HashMap<String, String>,
        query: HashMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();

        Self {
            method: method.into(),
            path: path.into(),
            headers,
            query,
            body,
            received_at: Timestamp::now(),
        }
    }

    /// Looks up a header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|err| Error::from_source(ErrorKind::Serialization, err).with_message("invalid JSON body"))
    }
}

/// An outbound HTTP request made by a provider adapter against a third-party
/// API, e.g. to register or tear down a webhook subscription during reconcile.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// Unique identifier for this request, used for correlation in logs.
    pub request_id: Uuid,
    /// Target URL.
    pub url: Url,
    /// HTTP method.
    pub method: OutboundMethod,
    /// JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Additional headers (authentication, content negotiation, etc).
    pub headers: HashMap<String, String>,
    /// Optional request timeout (uses client default if not set).
    pub timeout: Option<Duration>,
}

/// HTTP method for an [`OutboundRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl OutboundRequest {
    /// Creates a new outbound request.
    pub fn new(url: Url, method: OutboundMethod) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            url,
            method,
            body: None,
            headers: HashMap::new(),
            timeout: None,
        }
    }

    /// Attaches a JSON body.
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a custom header to the request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("X-Gitlab-Token".to_string(), "secret".to_string());

        let envelope = WebhookEnvelope::new("POST", "/hooks/abc", headers, HashMap::new(), b"{}".to_vec());

        assert_eq!(envelope.header("x-gitlab-token"), Some("secret"));
        assert_eq!(envelope.header("X-GITLAB-TOKEN"), Some("secret"));
        assert_eq!(envelope.header("missing"), None);
    }

    #[test]
    fn test_envelope_json() {
        let envelope = WebhookEnvelope::new(
            "POST",
            "/hooks/abc",
            HashMap::new(),
            HashMap::new(),
            br#"{"event":"push"}"#.to_vec(),
        );

        #[derive(Deserialize)]
        struct Body {
            event: String,
        }

        let body: Body = envelope.json().unwrap();
        assert_eq!(body.event, "push");
    }

    #[test]
    fn test_envelope_json_invalid() {
        let envelope = WebhookEnvelope::new("POST", "/hooks/abc", HashMap::new(), HashMap::new(), b"not json".to_vec());

        #[derive(Deserialize)]
        struct Body {
            #[allow(dead_code)]
            event: String,
        }

        assert!(envelope.json::<Body>().is_err());
    }

    #[test]
    fn test_outbound_request_builder() {
        let url = Url::parse("https://gitlab.example.com/api/v4/hooks").unwrap();
        let request = OutboundRequest::new(url, OutboundMethod::Post)
            .with_json(serde_json::json!({"url": "https://floww.example.com/hooks/1"}))
            .with_header("PRIVATE-TOKEN", "token123");

        assert_eq!(request.method, OutboundMethod::Post);
        assert!(request.body.is_some());
        assert_eq!(request.headers.get("PRIVATE-TOKEN"), Some(&"token123".to_string()));
    }
}
