//! The execution dispatcher: shared by webhook ingress, the scheduler's
//! cron callback, and manual invoke. Mints a workflow invocation JWT,
//! records the attempt, and hands a [`V2Payload`] to the configured
//! runtime backend without waiting for workflow code to finish running.

use std::collections::HashMap;

use floww_core::{Error as CoreError, Owner, Result as CoreResult};
use floww_postgres::model::{MarkExecutionStarted, NewExecutionHistory, Provider, Trigger, Workflow};
use floww_postgres::query::{
    ExecutionHistoryRepository, NamespaceRepository, ProviderRepository, RuntimeRepository, WorkflowDeploymentRepository,
};
use floww_postgres::types::ProviderKind;
use floww_runtime::{EventData, RuntimeConfig, TriggerDescriptor, TriggerProvider, V2Payload};
use serde_json::Value;
use uuid::Uuid;

use crate::service::ServiceState;

/// The outcome of a dispatch attempt: every branch produces an execution
/// row except a quota rejection, which is logged and otherwise silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The organization's execution quota was exceeded; nothing was recorded.
    QuotaExceeded,
    /// The workflow had no active deployment; an execution row was recorded
    /// with status `NoDeployment`.
    NoActiveDeployment(Uuid),
    /// The workflow's runtime had no resolvable image; an execution row was
    /// recorded with status `Started` but nothing was invoked.
    ImageUnresolved(Uuid),
    /// The runtime backend was invoked; an execution row was recorded with
    /// status `Started`.
    Invoked(Uuid),
}

impl DispatchOutcome {
    /// The execution id recorded for this attempt, if any.
    pub fn execution_id(self) -> Option<Uuid> {
        match self {
            Self::QuotaExceeded => None,
            Self::NoActiveDeployment(id) | Self::ImageUnresolved(id) | Self::Invoked(id) => Some(id),
        }
    }
}

fn provider_kind_str(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gitlab => "gitlab",
        ProviderKind::Slack => "slack",
        ProviderKind::Discord => "discord",
        ProviderKind::Github => "github",
        ProviderKind::Jira => "jira",
        ProviderKind::GoogleCalendar => "google_calendar",
        ProviderKind::Builtin => "builtin",
        ProviderKind::Kvstore => "kvstore",
    }
}

/// Dispatches a single trigger fire: mints an invocation JWT, records an
/// [`floww_postgres::model::ExecutionHistory`] row, and invokes the
/// workflow's active deployment through the configured runtime backend.
///
/// Returns once the invocation has been handed to the backend (or once a
/// terminal non-invoking outcome has been reached); never awaits workflow
/// code itself.
pub async fn dispatch(state: &ServiceState, trigger: &Trigger, workflow: &Workflow, data: EventData) -> CoreResult<DispatchOutcome> {
    let mut conn = state
        .pg_client()
        .get_connection()
        .await
        .map_err(|error| CoreError::internal(error.to_string()))?;

    let namespace = conn
        .find_namespace_by_id(workflow.namespace_id)
        .await
        .map_err(|error| CoreError::internal(error.to_string()))?
        .ok_or_else(|| CoreError::not_found(format!("namespace {} not found", workflow.namespace_id)))?;

    if let Owner::Organization(organization_id) = namespace.owner() {
        if !state.quota_check().check(organization_id).await {
            tracing::warn!(
                target: crate::TRACING_TARGET_DISPATCH,
                %organization_id,
                workflow_id = %workflow.id,
                "organization execution quota exceeded, dropping trigger fire"
            );
            return Ok(DispatchOutcome::QuotaExceeded);
        }
    }

    let received_at = jiff_diesel::Timestamp::from(jiff::Timestamp::now());

    let Some(deployment) = conn
        .find_active_deployment(workflow.id)
        .await
        .map_err(|error| CoreError::internal(error.to_string()))?
    else {
        let execution = conn
            .create_execution(NewExecutionHistory::no_deployment(workflow.id, trigger.id, received_at))
            .await
            .map_err(|error| CoreError::internal(error.to_string()))?;

        tracing::info!(target: crate::TRACING_TARGET_DISPATCH, workflow_id = %workflow.id, "no active deployment, execution recorded");
        return Ok(DispatchOutcome::NoActiveDeployment(execution.id));
    };

    let execution = conn
        .create_execution(NewExecutionHistory::received(workflow.id, trigger.id, deployment.id, received_at))
        .await
        .map_err(|error| CoreError::internal(error.to_string()))?;

    // Commit the STARTED transition before invoking the runtime: the history
    // row must be externally visible before the runtime's callback could
    // possibly reach `/api/executions/{id}/complete`.
    conn.mark_execution_started(execution.id, MarkExecutionStarted::at(jiff_diesel::Timestamp::from(jiff::Timestamp::now())))
        .await
        .map_err(|error| CoreError::internal(error.to_string()))?;

    let runtime = conn
        .find_runtime_by_id(deployment.runtime_id)
        .await
        .map_err(|error| CoreError::internal(error.to_string()))?
        .ok_or_else(|| CoreError::not_found(format!("runtime {} not found", deployment.runtime_id)))?;

    let Some(image_hash) = runtime.config.get("image_hash").and_then(Value::as_str) else {
        tracing::error!(target: crate::TRACING_TARGET_DISPATCH, runtime_id = %runtime.id, "runtime config has no image_hash");
        return Ok(DispatchOutcome::ImageUnresolved(execution.id));
    };

    let Some(image_digest) = state
        .image_resolver()
        .resolve(image_hash)
        .await
        .map_err(|error| CoreError::internal(error.to_string()))?
    else {
        tracing::error!(target: crate::TRACING_TARGET_DISPATCH, %image_hash, "image hash did not resolve to a digest");
        return Ok(DispatchOutcome::ImageUnresolved(execution.id));
    };

    let trigger_provider: Provider = conn
        .find_provider_by_id(trigger.provider_id)
        .await
        .map_err(|error| CoreError::internal(error.to_string()))?
        .ok_or_else(|| CoreError::not_found(format!("provider {} not found", trigger.provider_id)))?;

    let provider_configs = load_provider_configs(state, &mut conn, workflow.namespace_id).await?;

    let (auth_token, _invocation_id) = state
        .workflow_jwt()
        .mint(deployment.id, workflow.id, workflow.namespace_id)
        .map_err(|error| CoreError::auth(error.to_string()))?;

    let payload = V2Payload {
        trigger: TriggerDescriptor {
            provider: TriggerProvider {
                kind: provider_kind_str(trigger_provider.provider_type).to_string(),
                alias: trigger_provider.alias.clone(),
            },
            trigger_type: trigger.trigger_type.clone(),
            input: trigger.input.clone(),
        },
        data,
        backend_url: state.public_base_url().clone(),
        auth_token,
        execution_id: execution.id.to_string(),
        provider_configs,
    };

    let runtime_config = RuntimeConfig::new(deployment.runtime_id.to_string(), image_digest.to_string());

    if let Err(error) = state.runtime_backend().invoke_trigger(&runtime_config, &payload).await {
        tracing::error!(target: crate::TRACING_TARGET_DISPATCH, execution_id = %execution.id, %error, "runtime invocation failed");
    }

    Ok(DispatchOutcome::Invoked(execution.id))
}

/// Loads and decrypts every provider configured in `namespace_id`, keyed by
/// `"<type>:<alias>"` as the runtime payload expects. Providers with an
/// empty `encrypted_config` (auto-created, no-setup-steps providers) decrypt
/// to `null` rather than erroring.
async fn load_provider_configs(
    state: &ServiceState,
    conn: &mut floww_postgres::PgConn,
    namespace_id: Uuid,
) -> CoreResult<HashMap<String, Value>> {
    let providers = conn
        .list_providers(namespace_id)
        .await
        .map_err(|error| CoreError::internal(error.to_string()))?;

    let mut configs = HashMap::with_capacity(providers.len());
    for provider in providers {
        let config = if provider.encrypted_config.is_empty() {
            Value::Null
        } else {
            floww_core::crypto::decrypt_json::<Value>(state.encryption_key(), &provider.encrypted_config)
                .map_err(|error| CoreError::decryption(error.to_string()))?
        };

        let key = format!("{}:{}", provider_kind_str(provider.provider_type), provider.alias);
        configs.insert(key, config);
    }

    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_str_matches_wire_representation() {
        assert_eq!(provider_kind_str(ProviderKind::GoogleCalendar), "google_calendar");
        assert_eq!(provider_kind_str(ProviderKind::Gitlab), "gitlab");
    }

    #[test]
    fn quota_exceeded_outcome_has_no_execution_id() {
        assert_eq!(DispatchOutcome::QuotaExceeded.execution_id(), None);
    }
}
