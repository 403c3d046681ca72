//! The `google_calendar` provider: poll-based only, no webhook surface.
//! Every trigger type reconciles to a recurring poll job.

use floww_postgres::types::ProviderKind;
use floww_scheduler::JobSchedule;
use serde_json::{json, Value};

use crate::adapter::{Adapter, ProviderContext};
use crate::error::{ProviderError, ProviderResult};
use crate::utils::TriggerUtils;

const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 60;

pub struct GoogleCalendarAdapter;

#[async_trait::async_trait]
impl Adapter for GoogleCalendarAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoogleCalendar
    }

    async fn create(&self, _provider: &ProviderContext, trigger_type: &str, input: &Value, utils: &dyn TriggerUtils) -> ProviderResult<Value> {
        let _ = trigger_type;
        let interval_seconds = input.get("poll_interval_seconds").and_then(Value::as_u64).unwrap_or(DEFAULT_POLL_INTERVAL_SECONDS);

        if interval_seconds == 0 {
            return Err(ProviderError::InvalidInput {
                trigger_type: trigger_type.to_string(),
                message: "poll_interval_seconds must be greater than zero".to_string(),
            });
        }

        let task_id = utils.register_recurring_task(JobSchedule::IntervalSeconds(interval_seconds)).await?;
        Ok(json!({ "recurring_task_id": task_id, "poll_interval_seconds": interval_seconds }))
    }

    async fn destroy(&self, _provider: &ProviderContext, _trigger_type: &str, _input: &Value, _state: &Value, utils: &dyn TriggerUtils) -> ProviderResult<()> {
        utils.unregister_recurring_task().await
    }
}
