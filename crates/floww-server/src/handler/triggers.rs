//! Manual trigger invocation: `POST /api/triggers/{id}/invoke`.

use aide::axum::ApiRouter;
use aide::axum::routing::post_with;
use aide::transform::TransformOperation;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use floww_postgres::query::{TriggerRepository, WorkflowRepository};
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;
use crate::handler::response::ErrorResponse;
use crate::service::ServiceState;

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct InvokeTriggerRequest {
    #[serde(default)]
    pub triggered_by: Option<String>,
    #[serde(default)]
    pub input_data: Value,
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct InvokeTriggerResponse {
    pub status: &'static str,
    pub execution_id: Option<Uuid>,
}

/// Validates `input_data` against the trigger's declared `input_schema`, if
/// any. Triggers without one accept any payload.
fn validate_input(trigger_input: &Value, input_data: &Value) -> Result<(), Error<'static>> {
    let Some(schema) = trigger_input.get("input_schema") else {
        return Ok(());
    };

    let validator = Validator::new(schema).map_err(|error| Error::internal().with_context(format!("trigger has an invalid input_schema: {error}")))?;

    let errors: Vec<String> = validator.iter_errors(input_data).map(|error| error.to_string()).collect();
    if !errors.is_empty() {
        return Err(Error::bad_request().with_message(errors.join("; ")));
    }

    Ok(())
}

async fn invoke_trigger(
    State(state): State<ServiceState>,
    Path(trigger_id): Path<Uuid>,
    Json(body): Json<InvokeTriggerRequest>,
) -> Result<(StatusCode, Json<InvokeTriggerResponse>), Error<'static>> {
    let mut conn = state.pg_client().get_connection().await?;

    let trigger = conn.find_trigger_by_id(trigger_id).await?.ok_or_else(Error::not_found)?;

    validate_input(&trigger.input, &body.input_data)?;

    let workflow = conn.find_workflow_by_id(trigger.workflow_id).await?.ok_or_else(Error::not_found)?;

    let data = floww_runtime::EventData::Manual {
        manually_triggered: true,
        triggered_by: body.triggered_by.unwrap_or_default(),
        input_data: body.input_data,
    };

    let outcome = crate::dispatch::dispatch(&state, &trigger, &workflow, data).await?;

    tracing::info!(target: crate::TRACING_TARGET_INGRESS, trigger_id = %trigger.id, ?outcome, "manual invoke dispatched");

    Ok((StatusCode::OK, Json(InvokeTriggerResponse { status: "invoked", execution_id: outcome.execution_id() })))
}

fn invoke_trigger_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Manually invoke a trigger")
        .description("Dispatches a trigger outside of its normal provider event, validating input against its declared JSON schema if any.")
        .response::<200, Json<InvokeTriggerResponse>>()
        .response::<400, Json<ErrorResponse<'static>>>()
        .response::<404, Json<ErrorResponse<'static>>>()
}

pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .api_route("/api/triggers/{id}/invoke", post_with(invoke_trigger, invoke_trigger_docs))
        .with_path_items(|item| item.tag("Triggers"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn validate_input_accepts_missing_schema() {
        assert!(validate_input(&json!({}), &json!({"anything": true})).is_ok());
    }

    #[test]
    fn validate_input_rejects_missing_required_field() {
        let trigger_input = json!({"input_schema": {"type": "object", "required": ["name"]}});
        let result = validate_input(&trigger_input, &json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn validate_input_accepts_matching_payload() {
        let trigger_input = json!({"input_schema": {"type": "object", "required": ["name"]}});
        let result = validate_input(&trigger_input, &json!({"name": "alice"}));
        assert!(result.is_ok());
    }
}
