//! The provider adapter contract: one implementation per [`ProviderKind`],
//! covering both reconciling a trigger's external side effects (Reconcile
//! API) and matching inbound webhook traffic against declared triggers
//! (Match API).

use std::sync::Arc;

use floww_postgres::model::Trigger;
use floww_postgres::types::ProviderKind;
use floww_webhook::OutboundDelivery;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ProviderResult;
use crate::utils::TriggerUtils;

/// A provider's decrypted configuration, the identity under which it was
/// configured, and an outbound HTTP client for reaching the external API.
/// Passed to every adapter call that needs to reach the external system.
#[derive(Clone)]
pub struct ProviderContext {
    pub provider_id: Uuid,
    pub alias: String,
    pub config: Value,
    pub delivery: Arc<dyn OutboundDelivery>,
}

impl std::fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderContext")
            .field("provider_id", &self.provider_id)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

/// A response returned early from [`Adapter::validate_webhook`], short-
/// circuiting normal event processing (challenge/verification handshakes).
#[derive(Debug, Clone)]
pub struct EarlyResponse {
    pub status: u16,
    pub body: Value,
}

impl EarlyResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }
}

/// One implementation per [`ProviderKind`]. Reconcile methods manage a
/// trigger's external side effect (a registered webhook, a poll schedule);
/// Match methods classify and filter inbound webhook traffic.
///
/// Every method has a default that suits providers with nothing to reconcile
/// (`builtin`, `kvstore`) or that never receive webhooks (`google_calendar`):
/// `create`/`refresh` return `Value::Null` state, `destroy` is a no-op, and
/// `process_webhook` matches every candidate unfiltered.
#[async_trait::async_trait]
pub trait Adapter: Send + Sync {
    /// The provider type this adapter implements.
    fn kind(&self) -> ProviderKind;

    /// Creates the external side effect for a trigger and returns the
    /// opaque state to persist on the `Trigger` row.
    async fn create(&self, provider: &ProviderContext, trigger_type: &str, input: &Value, utils: &dyn TriggerUtils) -> ProviderResult<Value> {
        let _ = (provider, trigger_type, input, utils);
        Ok(Value::Null)
    }

    /// Verifies the external artifact described by `state` still exists,
    /// returning a possibly-updated state. Idempotent.
    async fn refresh(&self, provider: &ProviderContext, trigger_type: &str, input: &Value, state: &Value) -> ProviderResult<Value> {
        let _ = (provider, trigger_type, input);
        Ok(state.clone())
    }

    /// Deletes the external artifact described by `state`. Must tolerate an
    /// artifact that is already gone.
    async fn destroy(&self, provider: &ProviderContext, trigger_type: &str, input: &Value, state: &Value, utils: &dyn TriggerUtils) -> ProviderResult<()> {
        let _ = (provider, trigger_type, input, state, utils);
        Ok(())
    }

    /// Handles challenge/verification handshakes (Slack `url_verification`,
    /// Discord `PING`). Returning `Some` short-circuits normal processing.
    async fn validate_webhook(&self, envelope: &floww_webhook::WebhookEnvelope, provider: &ProviderContext) -> ProviderResult<Option<EarlyResponse>> {
        let _ = (envelope, provider);
        Ok(None)
    }

    /// Parses the provider's native event envelope and returns the subset
    /// of `candidates` whose `input` filters match the event.
    async fn process_webhook(
        &self,
        envelope: &floww_webhook::WebhookEnvelope,
        provider: &ProviderContext,
        candidates: &[Trigger],
    ) -> ProviderResult<Vec<Uuid>> {
        let _ = (envelope, provider);
        Ok(candidates.iter().map(|trigger| trigger.id).collect())
    }
}
