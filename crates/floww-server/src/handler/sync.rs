//! Declarative trigger reconcile: `POST /api/workflows/{id}/triggers/sync`.
//!
//! The Trigger Lifecycle Manager's entry point: diffs the caller's desired
//! trigger set against the workflow's current registry, protecting any
//! identity still materialized by the active deployment, then applies
//! `create`/`destroy`/`refresh` per difference through the matching
//! provider adapter.

use std::collections::HashSet;

use aide::axum::ApiRouter;
use aide::axum::routing::post_with;
use aide::transform::TransformOperation;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use floww_postgres::model::canonical_json;
use floww_postgres::query::{WorkflowDeploymentRepository, WorkflowRepository};
use floww_postgres::types::ProviderKind;
use floww_providers::{DesiredTrigger, SyncContext, TriggerIdentity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::error::Error;
use crate::handler::response::ErrorResponse;
use crate::service::ServiceState;

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct DesiredTriggerRequest {
    pub provider_type: ProviderKind,
    pub provider_alias: String,
    pub trigger_type: String,
    #[serde(default)]
    pub input: Value,
}

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
pub struct SyncTriggersRequest {
    #[serde(default)]
    pub triggers: Vec<DesiredTriggerRequest>,
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct SyncTriggersResponse {
    pub webhook_urls: Vec<Url>,
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct SyncFailure {
    pub trigger_type: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct SyncTriggersFailedResponse {
    pub failures: Vec<SyncFailure>,
}

/// Either every desired trigger reconciled cleanly, or at least one `toAdd`
/// failed (registry-level changes already flushed are not rolled back).
enum SyncResponse {
    Ok(SyncTriggersResponse),
    PartialFailure(SyncTriggersFailedResponse),
}

impl IntoResponse for SyncResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Self::PartialFailure(body) => (StatusCode::BAD_REQUEST, Json(body)).into_response(),
        }
    }
}

// Response documentation for this endpoint is supplied explicitly in
// `sync_triggers_docs`, so no schema needs to be inferred here.
impl aide::OperationOutput for SyncResponse {
    type Inner = Self;

    fn operation_response(_ctx: &mut aide::generate::GenContext, _operation: &mut aide::openapi::Operation) -> Option<aide::openapi::Response> {
        None
    }
}

/// Parses a deployment's `trigger_definitions` snapshot
/// (`[{provider: {type, alias}, triggerType, input}]`) into the identity set
/// the lifecycle manager protects from removal.
fn deployed_identities(trigger_definitions: &Value) -> HashSet<TriggerIdentity> {
    let Some(entries) = trigger_definitions.as_array() else {
        return HashSet::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let provider = entry.get("provider")?;
            let provider_type: ProviderKind = serde_json::from_value(provider.get("type")?.clone()).ok()?;
            let provider_alias = provider.get("alias")?.as_str()?.to_string();
            let trigger_type = entry.get("triggerType")?.as_str()?.to_string();
            let input = entry.get("input").cloned().unwrap_or(Value::Null);
            Some((provider_type, provider_alias, trigger_type, canonical_json(&input)))
        })
        .collect()
}

async fn sync_triggers(
    State(state): State<ServiceState>,
    Path(workflow_id): Path<Uuid>,
    Json(body): Json<SyncTriggersRequest>,
) -> Result<SyncResponse, Error<'static>> {
    let mut conn = state.pg_client().get_connection().await?;

    let workflow = conn.find_workflow_by_id(workflow_id).await?.ok_or_else(Error::not_found)?;

    let deployed = match conn.find_active_deployment(workflow_id).await? {
        Some(deployment) => deployed_identities(&deployment.trigger_definitions),
        None => HashSet::new(),
    };

    let desired = body
        .triggers
        .into_iter()
        .map(|item| DesiredTrigger {
            provider_type: item.provider_type,
            provider_alias: item.provider_alias,
            trigger_type: item.trigger_type,
            input: item.input,
        })
        .collect();

    let ctx = SyncContext {
        client: state.pg_client().clone(),
        job_store: state.job_store().clone(),
        delivery: state.delivery().inner(),
        public_base_url: state.public_base_url().clone(),
        encryption_key: state.encryption_key_handle(),
        make_callback: std::sync::Arc::new({
            let state = state.clone();
            move |trigger_id| crate::cron::cron_job_callback(state.clone(), trigger_id)
        }),
    };

    let outcome = floww_providers::sync(&ctx, workflow.id, workflow.namespace_id, desired, &deployed).await?;

    tracing::info!(
        target: crate::TRACING_TARGET_RECONCILE,
        workflow_id = %workflow.id,
        webhook_count = outcome.webhook_urls.len(),
        failure_count = outcome.failures.len(),
        "trigger sync completed"
    );

    if outcome.failures.is_empty() {
        return Ok(SyncResponse::Ok(SyncTriggersResponse { webhook_urls: outcome.webhook_urls }));
    }

    let failures = outcome.failures.into_iter().map(|failure| SyncFailure { trigger_type: failure.trigger_type, error: failure.error }).collect();
    Ok(SyncResponse::PartialFailure(SyncTriggersFailedResponse { failures }))
}

fn sync_triggers_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Reconcile a workflow's declared triggers")
        .description(
            "Diffs the desired trigger set against what is currently registered, \
             creating/destroying/refreshing triggers through their provider adapters. \
             Triggers still referenced by the active deployment are never removed.",
        )
        .response::<200, Json<SyncTriggersResponse>>()
        .response::<400, Json<SyncTriggersFailedResponse>>()
        .response::<404, Json<ErrorResponse<'static>>>()
}

pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .api_route("/api/workflows/{id}/triggers/sync", post_with(sync_triggers, sync_triggers_docs))
        .with_path_items(|item| item.tag("Triggers"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deployed_identities_parses_a_snapshot_entry() {
        let snapshot = json!([
            {"provider": {"type": "gitlab", "alias": "main"}, "triggerType": "onPush", "input": {"projectId": "42"}}
        ]);
        let identities = deployed_identities(&snapshot);
        assert_eq!(identities.len(), 1);
        assert!(identities.contains(&(ProviderKind::Gitlab, "main".to_string(), "onPush".to_string(), canonical_json(&json!({"projectId": "42"})))));
    }

    #[test]
    fn deployed_identities_skips_malformed_entries() {
        let snapshot = json!([{"provider": {"type": "gitlab"}}]);
        assert!(deployed_identities(&snapshot).is_empty());
    }

    #[test]
    fn deployed_identities_defaults_to_empty_for_non_array() {
        assert!(deployed_identities(&Value::Null).is_empty());
    }
}
