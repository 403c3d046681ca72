//! The `discord` provider: gateway-style dispatch envelopes, plus the
//! interaction `PING` handshake.
//!
//! Discord gateway subscriptions are configured in the Developer Portal, not
//! via a reconcile API call, so `create`/`destroy`/`refresh` only manage the
//! local webhook row.

use floww_postgres::model::Trigger;
use floww_postgres::types::ProviderKind;
use serde_json::Value;
use uuid::Uuid;

use crate::adapter::{Adapter, EarlyResponse, ProviderContext};
use crate::error::ProviderResult;
use crate::utils::{RegisterWebhookRequest, TriggerUtils, WebhookOwner};

const TRIGGER_ON_MESSAGE: &str = "onMessage";
const TRIGGER_ON_REACTION: &str = "onReaction";
const TRIGGER_ON_MEMBER_JOIN: &str = "onMemberJoin";
const TRIGGER_ON_MEMBER_LEAVE: &str = "onMemberLeave";
const TRIGGER_ON_MEMBER_UPDATE: &str = "onMemberUpdate";

pub struct DiscordAdapter;

fn trigger_type_for_dispatch(t: &str) -> Option<&'static str> {
    match t {
        "MESSAGE_CREATE" | "MESSAGE_UPDATE" => Some(TRIGGER_ON_MESSAGE),
        "MESSAGE_REACTION_ADD" => Some(TRIGGER_ON_REACTION),
        "GUILD_MEMBER_ADD" => Some(TRIGGER_ON_MEMBER_JOIN),
        "GUILD_MEMBER_REMOVE" => Some(TRIGGER_ON_MEMBER_LEAVE),
        "GUILD_MEMBER_UPDATE" => Some(TRIGGER_ON_MEMBER_UPDATE),
        _ => None,
    }
}

#[async_trait::async_trait]
impl Adapter for DiscordAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Discord
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
        if body.get("type").and_then(Value::as_i64) == Some(1) {
            return Ok(Some(EarlyResponse::ok(serde_json::json!({ "type": 1 }))));
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
        let Some(dispatch) = body.get("t").and_then(Value::as_str) else {
            return Ok(Vec::new());
        };
        let Some(trigger_type) = trigger_type_for_dispatch(dispatch) else {
            return Ok(Vec::new());
        };

        let data = body.get("d").unwrap_or(&Value::Null);
        let is_bot_author = data
            .get("author")
            .and_then(|author| author.get("bot"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let is_edit = dispatch == "MESSAGE_UPDATE";

        Ok(candidates
            .iter()
            .filter(|trigger| trigger.trigger_type == trigger_type)
            .filter(|trigger| !is_bot_author || super::flag_enabled(&trigger.input, "include_bots"))
            .filter(|trigger| !is_edit || super::flag_enabled(&trigger.input, "include_edits"))
            .filter(|trigger| super::filter_matches(&trigger.input, "guild_id", data.get("guild_id").unwrap_or(&Value::Null)))
            .filter(|trigger| super::filter_matches(&trigger.input, "channel_id", data.get("channel_id").unwrap_or(&Value::Null)))
            .filter(|trigger| super::filter_matches(&trigger.input, "user_id", data.get("user_id").unwrap_or(&Value::Null)))
            .filter(|trigger| super::filter_matches(&trigger.input, "emoji", data.get("emoji").unwrap_or(&Value::Null)))
            .map(|trigger| trigger.id)
            .collect())
    }
}
