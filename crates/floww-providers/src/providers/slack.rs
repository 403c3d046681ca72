//! The `slack` provider: Events API `message` callbacks, plus the
//! `url_verification` handshake.
//!
//! Event Subscriptions are wired up by hand in the Slack app dashboard, so
//! `create`/`destroy`/`refresh` only manage the local webhook row.

use floww_postgres::model::Trigger;
use floww_postgres::types::ProviderKind;
use serde_json::Value;
use uuid::Uuid;

use crate::adapter::{Adapter, EarlyResponse, ProviderContext};
use crate::error::ProviderResult;
use crate::utils::{RegisterWebhookRequest, TriggerUtils, WebhookOwner};

pub struct SlackAdapter;

const TRIGGER_ON_MESSAGE: &str = "onMessage";

#[async_trait::async_trait]
impl Adapter for SlackAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Slack
    }

    async fn create(&self, _provider: &ProviderContext, _trigger_type: &str, _input: &Value, utils: &dyn TriggerUtils) -> ProviderResult<Value> {
        let webhook = utils
            .register_webhook(RegisterWebhookRequest {
                path: None,
                method: Some("POST".to_string()),
                owner: WebhookOwner::Provider,
                reuse_existing: true,
            })
            .await?;

        Ok(serde_json::json!({ "webhook_id": webhook.id, "path": webhook.path }))
    }

    async fn validate_webhook(&self, envelope: &floww_webhook::WebhookEnvelope, _provider: &ProviderContext) -> ProviderResult<Option<EarlyResponse>> {
        let body: Value = envelope.json()?;
        if body.get("type").and_then(Value::as_str) == Some("url_verification") {
            let challenge = body.get("challenge").cloned().unwrap_or(Value::Null);
            return Ok(Some(EarlyResponse::ok(serde_json::json!({ "challenge": challenge }))));
        }
        Ok(None)
    }

    async fn process_webhook(
        &self,
        envelope: &floww_webhook::WebhookEnvelope,
        _provider: &ProviderContext,
        candidates: &[Trigger],
    ) -> ProviderResult<Vec<Uuid>> {
        let body: Value = envelope.json()?;
        if body.get("type").and_then(Value::as_str) != Some("event_callback") {
            return Ok(Vec::new());
        }

        let Some(event) = body.get("event") else {
            return Ok(Vec::new());
        };
        if event.get("type").and_then(Value::as_str) != Some("message") {
            return Ok(Vec::new());
        }
        if event.get("bot_id").is_some() {
            return Ok(Vec::new());
        }

        match event.get("subtype").and_then(Value::as_str) {
            None | Some("thread_broadcast") => {}
            Some(_) => return Ok(Vec::new()),
        }

        let is_thread_reply = event.get("thread_ts").is_some();

        Ok(candidates
            .iter()
            .filter(|trigger| trigger.trigger_type == TRIGGER_ON_MESSAGE)
            .filter(|trigger| !is_thread_reply || super::flag_enabled(&trigger.input, "include_thread_messages"))
            .filter(|trigger| super::filter_matches(&trigger.input, "channel_id", event.get("channel").unwrap_or(&Value::Null)))
            .filter(|trigger| super::filter_matches(&trigger.input, "user_id", event.get("user").unwrap_or(&Value::Null)))
            .map(|trigger| trigger.id)
            .collect())
    }
}
