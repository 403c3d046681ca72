//! Execution status reporting: `POST /api/executions/{id}/complete` and
//! `POST /api/executions/{id}/fail`, called back by the runtime a
//! deployment was dispatched to.

use aide::axum::ApiRouter;
use aide::axum::routing::post_with;
use aide::transform::TransformOperation;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use floww_postgres::model::MarkExecutionFinished;
use floww_postgres::query::ExecutionHistoryRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::extract::VerifiedWorkflowClaims;
use crate::handler::response::ErrorResponse;
use crate::service::ServiceState;

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct CompleteExecutionRequest {
    #[serde(default)]
    pub logs: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct FailExecutionRequest {
    pub error_message: String,
    #[serde(default)]
    pub error_stack: Option<String>,
    #[serde(default)]
    pub logs: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct ExecutionStatusResponse {
    pub execution_id: Uuid,
    pub status: &'static str,
}

/// Confirms the caller's workflow invocation token actually corresponds to
/// the execution it is reporting on, so one deployment's runtime cannot
/// report outcomes for another's executions.
async fn authorize_execution_report(
    state: &ServiceState,
    claims: &crate::service::WorkflowClaims,
    execution_id: Uuid,
) -> Result<floww_postgres::model::ExecutionHistory, Error<'static>> {
    let mut conn = state.pg_client().get_connection().await?;
    let execution = conn.find_execution_by_id(execution_id).await?.ok_or_else(Error::not_found)?;

    if execution.deployment_id != Some(claims.deployment_id) || execution.workflow_id != claims.workflow_id {
        return Err(Error::forbidden().with_context("execution does not belong to the invoking deployment"));
    }

    if execution.is_terminal() {
        return Err(Error::conflict().with_context("execution has already reached a terminal status"));
    }

    Ok(execution)
}

async fn complete_execution(
    State(state): State<ServiceState>,
    Path(execution_id): Path<Uuid>,
    VerifiedWorkflowClaims(claims): VerifiedWorkflowClaims,
    Json(body): Json<CompleteExecutionRequest>,
) -> Result<(StatusCode, Json<ExecutionStatusResponse>), Error<'static>> {
    let execution = authorize_execution_report(&state, &claims, execution_id).await?;

    let mut conn = state.pg_client().get_connection().await?;
    let completed_at = jiff_diesel::Timestamp::from(jiff::Timestamp::now());
    conn.mark_execution_finished(execution.id, MarkExecutionFinished::completed(completed_at, body.logs)).await?;

    tracing::info!(target: crate::TRACING_TARGET_EXECUTIONS, execution_id = %execution.id, "execution completed");

    Ok((StatusCode::OK, Json(ExecutionStatusResponse { execution_id: execution.id, status: "completed" })))
}

async fn fail_execution(
    State(state): State<ServiceState>,
    Path(execution_id): Path<Uuid>,
    VerifiedWorkflowClaims(claims): VerifiedWorkflowClaims,
    Json(body): Json<FailExecutionRequest>,
) -> Result<(StatusCode, Json<ExecutionStatusResponse>), Error<'static>> {
    let execution = authorize_execution_report(&state, &claims, execution_id).await?;

    let mut conn = state.pg_client().get_connection().await?;
    let completed_at = jiff_diesel::Timestamp::from(jiff::Timestamp::now());
    conn.mark_execution_finished(execution.id, MarkExecutionFinished::failed(completed_at, body.error_message, body.error_stack, body.logs))
        .await?;

    tracing::warn!(target: crate::TRACING_TARGET_EXECUTIONS, execution_id = %execution.id, "execution failed");

    Ok((StatusCode::OK, Json(ExecutionStatusResponse { execution_id: execution.id, status: "failed" })))
}

fn complete_execution_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Report execution success")
        .description("Called by the runtime once workflow code finishes successfully.")
        .response::<200, Json<ExecutionStatusResponse>>()
        .response::<403, Json<ErrorResponse<'static>>>()
        .response::<409, Json<ErrorResponse<'static>>>()
}

fn fail_execution_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Report execution failure")
        .description("Called by the runtime when workflow code raises or times out.")
        .response::<200, Json<ExecutionStatusResponse>>()
        .response::<403, Json<ErrorResponse<'static>>>()
        .response::<409, Json<ErrorResponse<'static>>>()
}

pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .api_route("/api/executions/{id}/complete", post_with(complete_execution, complete_execution_docs))
        .api_route("/api/executions/{id}/fail", post_with(fail_execution, fail_execution_docs))
        .with_path_items(|item| item.tag("Executions"))
}
