//! The scheduler's tick-firing path: a cron-driven trigger calls back into
//! the shared dispatcher exactly like a webhook or manual invoke would.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use floww_postgres::query::{TriggerRepository, WorkflowRepository};
use floww_scheduler::{JobCallback, JobResolver, JobSchedule};
use serde_json::Value;
use uuid::Uuid;

use crate::service::ServiceState;

/// Reads a trigger's firing cadence out of its `input`, mirroring the
/// `builtin` provider's own `onCron` schema: `cron` or `interval_seconds`.
fn cron_schedule(input: &Value) -> Option<JobSchedule> {
    if let Some(expression) = input.get("cron").and_then(Value::as_str) {
        return Some(JobSchedule::Cron(expression.to_string()));
    }
    if let Some(seconds) = input.get("interval_seconds").and_then(Value::as_u64) {
        return Some(JobSchedule::IntervalSeconds(seconds));
    }
    None
}

/// The `expression` reported in the fired event's payload: the cron string
/// itself, or a synthetic description for an interval schedule.
fn schedule_expression(schedule: &JobSchedule) -> String {
    match schedule {
        JobSchedule::Cron(expression) => expression.clone(),
        JobSchedule::IntervalSeconds(seconds) => format!("every {seconds}s"),
    }
}

/// Fires a single cron tick: loads the trigger and its workflow, builds the
/// cron event payload, and hands it to the shared dispatcher. Any failure is
/// logged with full context; the trigger's status is left non-terminal so
/// the next tick can try again.
async fn execute_cron_job(state: &ServiceState, trigger_id: Uuid) {
    let mut conn = match state.pg_client().get_connection().await {
        Ok(conn) => conn,
        Err(error) => {
            tracing::error!(target: crate::TRACING_TARGET_DISPATCH, %trigger_id, %error, "failed to acquire connection for cron fire");
            return;
        }
    };

    let trigger = match conn.find_trigger_by_id(trigger_id).await {
        Ok(Some(trigger)) => trigger,
        Ok(None) => {
            tracing::warn!(target: crate::TRACING_TARGET_DISPATCH, %trigger_id, "cron fire for a trigger that no longer exists");
            return;
        }
        Err(error) => {
            tracing::error!(target: crate::TRACING_TARGET_DISPATCH, %trigger_id, %error, "failed to load trigger for cron fire");
            return;
        }
    };

    let Some(schedule) = cron_schedule(&trigger.input) else {
        tracing::warn!(target: crate::TRACING_TARGET_DISPATCH, %trigger_id, "cron fire for a trigger with no cron/interval_seconds input");
        return;
    };

    let workflow = match conn.find_workflow_by_id(trigger.workflow_id).await {
        Ok(Some(workflow)) => workflow,
        Ok(None) => {
            tracing::error!(target: crate::TRACING_TARGET_DISPATCH, workflow_id = %trigger.workflow_id, "workflow not found for cron fire");
            return;
        }
        Err(error) => {
            tracing::error!(target: crate::TRACING_TARGET_DISPATCH, %error, "failed to load workflow for cron fire");
            return;
        }
    };

    let data = floww_runtime::EventData::Cron {
        scheduled_time: jiff::Timestamp::now().to_string(),
        expression: schedule_expression(&schedule),
    };

    if let Err(error) = crate::dispatch::dispatch(state, &trigger, &workflow, data).await {
        tracing::error!(target: crate::TRACING_TARGET_DISPATCH, %trigger_id, %error, "cron dispatch failed");
    }
}

/// Builds the tick callback invoked by the scheduler when `trigger_id`
/// fires. Shared between [`cron_job_resolver`] (boot-time reconcile) and the
/// lifecycle manager's `SyncContext::make_callback` (trigger creation).
pub fn cron_job_callback(state: ServiceState, trigger_id: Uuid) -> JobCallback {
    Arc::new(move || {
        let state = state.clone();
        Box::pin(async move { execute_cron_job(&state, trigger_id).await }) as Pin<Box<dyn Future<Output = ()> + Send>>
    })
}

/// Resolves a `RecurringTask` row's current schedule and tick callback for
/// [`floww_scheduler::JobStore::sync_all_recurring_tasks`].
///
/// Reloads the trigger by id on every call so a tick always runs against its
/// current `input` rather than a schedule captured once at boot; a missing
/// trigger or unparsable schedule resolves to `None`, telling the store to
/// drop the job.
pub fn cron_job_resolver(state: ServiceState) -> JobResolver {
    Arc::new(move |trigger_id: Uuid| {
        let state = state.clone();
        Box::pin(async move {
            let mut conn = state.pg_client().get_connection().await.ok()?;
            let trigger = conn.find_trigger_by_id(trigger_id).await.ok()??;
            let schedule = cron_schedule(&trigger.input)?;
            Some((schedule, cron_job_callback(state.clone(), trigger_id)))
        }) as Pin<Box<dyn Future<Output = Option<(JobSchedule, JobCallback)>> + Send>>
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn cron_schedule_reads_cron_expression() {
        let schedule = cron_schedule(&json!({"cron": "*/10 * * * *"}));
        assert_eq!(schedule, Some(JobSchedule::Cron("*/10 * * * *".to_string())));
    }

    #[test]
    fn cron_schedule_reads_interval_seconds() {
        let schedule = cron_schedule(&json!({"interval_seconds": 60}));
        assert_eq!(schedule, Some(JobSchedule::IntervalSeconds(60)));
    }

    #[test]
    fn cron_schedule_is_none_without_either_field() {
        assert_eq!(cron_schedule(&json!({})), None);
    }

    #[test]
    fn schedule_expression_reports_the_cron_string_verbatim() {
        let schedule = JobSchedule::Cron("0 * * * * *".to_string());
        assert_eq!(schedule_expression(&schedule), "0 * * * * *");
    }

    #[test]
    fn schedule_expression_describes_an_interval() {
        let schedule = JobSchedule::IntervalSeconds(30);
        assert_eq!(schedule_expression(&schedule), "every 30s");
    }
}
