//! Outbound delivery service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::{OutboundRequest, Result, TRACING_TARGET};

/// A client capable of delivering an [`OutboundRequest`] to a provider API.
///
/// Provider adapters depend on this trait rather than on a concrete HTTP
/// client so that reconcile calls (register/destroy webhook subscriptions,
/// create recurring task registrations, etc) can be tested without a
/// network.
#[async_trait::async_trait]
pub trait OutboundDelivery: Send + Sync {
    /// Delivers the request and returns the provider's response.
    async fn deliver(&self, request: &OutboundRequest) -> Result<crate::DeliveryResponse>;

    /// Checks whether this delivery client is currently able to serve requests.
    async fn health_check(&self) -> Result<floww_core::ServiceHealth>;
}

/// Delivery service wrapper adding structured logging around any
/// [`OutboundDelivery`] implementation.
///
/// The inner client is wrapped in `Arc` for cheap cloning across adapters.
#[derive(Clone)]
pub struct WebhookService {
    inner: Arc<dyn OutboundDelivery>,
}

impl fmt::Debug for WebhookService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookService").finish_non_exhaustive()
    }
}

impl WebhookService {
    /// Creates a new delivery service wrapper.
    pub fn new<P>(client: P) -> Self
    where
        P: OutboundDelivery + 'static,
    {
        Self {
            inner: Arc::new(client),
        }
    }

    /// Delivers an outbound request to a provider API.
    pub async fn deliver(&self, request: &OutboundRequest) -> Result<crate::DeliveryResponse> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            url = %request.url,
            "Delivering outbound provider request"
        );

        let result = self.inner.deliver(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(response) => {
                if response.is_success() {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        request_id = %request.request_id,
                        response_id = %response.response_id,
                        status_code = response.status_code,
                        elapsed_ms = elapsed.as_millis(),
                        "Provider request delivered successfully"
                    );
                } else {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        request_id = %request.request_id,
                        response_id = %response.response_id,
                        status_code = response.status_code,
                        retryable = response.is_retryable(),
                        elapsed_ms = elapsed.as_millis(),
                        "Provider request failed"
                    );
                }
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Provider request delivery error"
                );
            }
        }

        result
    }

    /// Checks whether the underlying client is healthy.
    pub async fn health_check(&self) -> Result<floww_core::ServiceHealth> {
        self.inner.health_check().await
    }

    /// Returns the wrapped client as a bare [`OutboundDelivery`], for
    /// callers (provider adapters) that need an `Arc<dyn OutboundDelivery>`
    /// rather than the logging wrapper.
    pub fn inner(&self) -> Arc<dyn OutboundDelivery> {
        self.inner.clone()
    }
}

#[async_trait::async_trait]
impl OutboundDelivery for WebhookService {
    async fn deliver(&self, request: &OutboundRequest) -> Result<crate::DeliveryResponse> {
        WebhookService::deliver(self, request).await
    }

    async fn health_check(&self) -> Result<floww_core::ServiceHealth> {
        WebhookService::health_check(self).await
    }
}
