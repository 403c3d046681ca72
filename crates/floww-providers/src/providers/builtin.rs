//! The `builtin` provider: path-based webhooks and cron schedules with no
//! external system behind them.

use floww_postgres::types::ProviderKind;
use floww_scheduler::JobSchedule;
use serde_json::{json, Value};

use crate::adapter::{Adapter, ProviderContext};
use crate::error::{ProviderError, ProviderResult};
use crate::utils::{RegisterWebhookRequest, TriggerUtils, WebhookOwner};

const TRIGGER_ON_WEBHOOK: &str = "onWebhook";
const TRIGGER_ON_CRON: &str = "onCron";

pub struct BuiltinAdapter;

fn cron_schedule(input: &Value) -> ProviderResult<JobSchedule> {
    if let Some(expression) = input.get("cron").and_then(Value::as_str) {
        return Ok(JobSchedule::Cron(expression.to_string()));
    }
    if let Some(seconds) = input.get("interval_seconds").and_then(Value::as_u64) {
        return Ok(JobSchedule::IntervalSeconds(seconds));
    }
    Err(ProviderError::InvalidInput {
        trigger_type: TRIGGER_ON_CRON.to_string(),
        message: "expected one of `cron` or `interval_seconds`".to_string(),
    })
}

#[async_trait::async_trait]
impl Adapter for BuiltinAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Builtin
    }

    async fn create(&self, _provider: &ProviderContext, trigger_type: &str, input: &Value, utils: &dyn TriggerUtils) -> ProviderResult<Value> {
        match trigger_type {
            TRIGGER_ON_WEBHOOK => {
                let request = RegisterWebhookRequest {
                    path: input.get("path").and_then(Value::as_str).map(str::to_string),
                    method: input.get("method").and_then(Value::as_str).map(str::to_string),
                    owner: WebhookOwner::Trigger,
                    reuse_existing: false,
                };
                let webhook = utils.register_webhook(request).await?;
                Ok(json!({ "webhook_id": webhook.id, "path": webhook.path, "url": webhook.url.to_string() }))
            }
            TRIGGER_ON_CRON => {
                let schedule = cron_schedule(input)?;
                let task_id = utils.register_recurring_task(schedule).await?;
                Ok(json!({ "recurring_task_id": task_id }))
            }
            other => Err(ProviderError::InvalidInput {
                trigger_type: other.to_string(),
                message: "builtin only supports `onWebhook` and `onCron`".to_string(),
            }),
        }
    }

    async fn destroy(&self, _provider: &ProviderContext, trigger_type: &str, _input: &Value, _state: &Value, utils: &dyn TriggerUtils) -> ProviderResult<()> {
        if trigger_type == TRIGGER_ON_CRON {
            utils.unregister_recurring_task().await?;
        }
        // `onWebhook`'s incoming_webhooks row cascades away with the
        // Trigger row the caller deletes next; nothing live to tear down.
        Ok(())
    }
}
