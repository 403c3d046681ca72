//! Reqwest-based HTTP client for outbound provider API calls.

use std::sync::Arc;

use jiff::Timestamp;
use reqwest::Client;

use super::{Error, ReqwestConfig, TRACING_TARGET};
use crate::request::OutboundMethod;
use crate::{DeliveryResponse, OutboundDelivery, OutboundRequest, ServiceHealth, WebhookService};

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
}

/// Reqwest-based HTTP client for calling provider APIs during reconcile
/// (registering webhook subscriptions, creating/destroying recurring task
/// registrations, and the like).
///
/// # Examples
///
/// ```rust,ignore
/// use floww_webhook::reqwest::{ReqwestClient, ReqwestConfig};
/// use floww_webhook::{OutboundRequest, OutboundMethod};
/// use url::Url;
///
/// let client = ReqwestClient::new(ReqwestConfig::default());
/// let url = Url::parse("https://gitlab.example.com/api/v4/hooks")?;
/// let request = OutboundRequest::new(url, OutboundMethod::Post);
/// let response = client.deliver(&request).await?;
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    pub fn new(config: ReqwestConfig) -> Self {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .expect("failed to create HTTP client");

        let inner = ReqwestClientInner { http, config };
        let client = Self {
            inner: Arc::new(inner),
        };

        tracing::info!(target: TRACING_TARGET, "Reqwest client created successfully");

        client
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Converts this client into a [`WebhookService`] for use with dependency injection.
    pub fn into_service(self) -> WebhookService {
        WebhookService::new(self)
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new(ReqwestConfig::default())
    }
}

#[async_trait::async_trait]
impl OutboundDelivery for ReqwestClient {
    async fn deliver(&self, request: &OutboundRequest) -> crate::Result<DeliveryResponse> {
        let started_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            url = %request.url,
            method = ?request.method,
            "Sending outbound provider request"
        );

        let timeout = request.timeout.unwrap_or_else(|| self.config().timeout());

        let mut http_request = match request.method {
            OutboundMethod::Get => self.http().get(request.url.as_str()),
            OutboundMethod::Post => self.http().post(request.url.as_str()),
            OutboundMethod::Put => self.http().put(request.url.as_str()),
            OutboundMethod::Patch => self.http().patch(request.url.as_str()),
            OutboundMethod::Delete => self.http().delete(request.url.as_str()),
        }
        .timeout(timeout);

        for (name, value) in &request.headers {
            http_request = http_request.header(name, value);
        }

        if let Some(ref body) = request.body {
            http_request = http_request.json(body);
        }

        let http_response = http_request.send().await.map_err(Error::from)?;
        let status_code = http_response.status().as_u16();
        let body = http_response.json::<serde_json::Value>().await.ok();

        let response = DeliveryResponse::new(request.request_id, status_code, started_at, body);

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            status_code,
            success = response.is_success(),
            "Outbound provider request completed"
        );

        Ok(response)
    }

    async fn health_check(&self) -> crate::Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceStatus;

    #[test]
    fn test_client_creation() {
        let config = ReqwestConfig::default();
        let client = ReqwestClient::new(config);
        assert!(client.config().user_agent.is_none());
    }

    #[tokio::test]
    async fn test_health_check() {
        let client = ReqwestClient::default();
        let health = client.health_check().await.unwrap();
        assert_eq!(health.status, ServiceStatus::Healthy);
    }
}
