//! Outbound provider API response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The result of delivering an [`crate::OutboundRequest`] to a provider API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResponse {
    /// Unique identifier for this response.
    pub response_id: Uuid,
    /// Request ID this response corresponds to.
    pub request_id: Uuid,
    /// HTTP status code returned by the provider (0 if the request failed
    /// before a response was received).
    pub status_code: u16,
    /// Response body, if present and parseable as JSON.
    pub body: Option<serde_json::Value>,
    /// Timestamp when the request was initiated.
    pub started_at: Timestamp,
    /// Timestamp when the response was received.
    pub finished_at: Timestamp,
}

impl DeliveryResponse {
    /// Creates a new delivery response.
    pub fn new(request_id: Uuid, status_code: u16, started_at: Timestamp, body: Option<serde_json::Value>) -> Self {
        Self {
            response_id: Uuid::now_v7(),
            request_id,
            status_code,
            body,
            started_at,
            finished_at: Timestamp::now(),
        }
    }

    /// Returns whether the call was successful (2xx status code).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Calculates the response time as a duration.
    pub fn duration(&self) -> jiff::Span {
        self.started_at.until(self.finished_at).unwrap_or_default()
    }

    /// Checks if the response indicates a retryable error.
    pub fn is_retryable(&self) -> bool {
        if self.is_success() {
            return false;
        }

        self.status_code == 0
            || self.status_code >= 500
            || self.status_code == 408
            || self.status_code == 429
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let request_id = Uuid::now_v7();
        let started_at = Timestamp::now();
        let response = DeliveryResponse::new(request_id, 200, started_at, None);

        assert!(response.is_success());
        assert_eq!(response.request_id, request_id);
        assert_eq!(response.status_code, 200);
    }

    #[test]
    fn test_is_retryable() {
        let started_at = Timestamp::now();

        assert!(!DeliveryResponse::new(Uuid::now_v7(), 200, started_at, None).is_retryable());
        assert!(DeliveryResponse::new(Uuid::now_v7(), 500, started_at, None).is_retryable());
        assert!(DeliveryResponse::new(Uuid::now_v7(), 503, started_at, None).is_retryable());
        assert!(DeliveryResponse::new(Uuid::now_v7(), 429, started_at, None).is_retryable());
        assert!(DeliveryResponse::new(Uuid::now_v7(), 408, started_at, None).is_retryable());
        assert!(!DeliveryResponse::new(Uuid::now_v7(), 400, started_at, None).is_retryable());
        assert!(!DeliveryResponse::new(Uuid::now_v7(), 404, started_at, None).is_retryable());
        assert!(DeliveryResponse::new(Uuid::now_v7(), 0, started_at, None).is_retryable());
    }
}
