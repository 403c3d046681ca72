//! Event ingress: `ANY /webhook/{path*}`.
//!
//! Looks up the inbound path, hands the raw request to the owning
//! provider's adapter for matching, and spawns one independent dispatch per
//! matching trigger. The response is sent once dispatches are scheduled,
//! without waiting for them to finish.

use std::collections::HashMap;

use aide::axum::ApiRouter;
use aide::axum::routing::any_with;
use aide::transform::TransformOperation;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use floww_postgres::query::{IncomingWebhookRepository, ProviderRepository, TriggerRepository, WorkflowRepository};
use floww_providers::adapter::ProviderContext;
use floww_providers::registry::adapter_for;
use floww_webhook::WebhookEnvelope;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;
use crate::handler::response::ErrorResponse;
use crate::service::ServiceState;

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct WebhookInvokedResponse {
    pub status: &'static str,
    pub workflow_id: Uuid,
    pub webhook_id: Uuid,
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct WebhookNoMatchResponse {
    pub message: &'static str,
}

/// The three shapes an ingress response can take: dispatched, unmatched
/// (both 200, so a response never leaks whether a trigger exists), or an
/// adapter-issued handshake response (Slack/Discord challenge replies).
enum WebhookResponse {
    Invoked(WebhookInvokedResponse),
    NoMatch,
    Early { status: u16, body: Value },
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Invoked(body) => Json(body).into_response(),
            Self::NoMatch => Json(WebhookNoMatchResponse { message: "No active deployment" }).into_response(),
            Self::Early { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
                (status, Json(body)).into_response()
            }
        }
    }
}

// Response documentation for this endpoint is supplied explicitly in
// `handle_webhook_docs`, so no schema needs to be inferred here.
impl aide::OperationOutput for WebhookResponse {
    type Inner = Self;

    fn operation_response(_ctx: &mut aide::generate::GenContext, _operation: &mut aide::openapi::Operation) -> Option<aide::openapi::Response> {
        None
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.starts_with('/') { trimmed.to_string() } else { format!("/{trimmed}") }
}

async fn handle_webhook(
    State(state): State<ServiceState>,
    method: Method,
    Path(raw_path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<WebhookResponse, Error<'static>> {
    let path = normalize_path(&raw_path);

    let mut conn = state.pg_client().get_connection().await?;

    let webhook = conn
        .find_incoming_webhook_by_path(&path, method.as_str())
        .await?
        .ok_or_else(|| Error::not_found().with_context(format!("no incoming webhook registered for {path}")))?;

    let candidates = if let Some(trigger_id) = webhook.trigger_id {
        let trigger = conn.find_trigger_by_id(trigger_id).await?.ok_or_else(Error::not_found)?;
        vec![trigger]
    } else {
        let provider_id = webhook.provider_id.ok_or_else(Error::internal)?;
        conn.list_triggers_by_provider(provider_id).await?
    };

    let provider_id = candidates.first().map(|trigger| trigger.provider_id).ok_or_else(Error::not_found)?;

    let provider = conn.find_provider_by_id(provider_id).await?.ok_or_else(Error::not_found)?;

    let provider_config = if provider.encrypted_config.is_empty() {
        Value::Null
    } else {
        floww_core::crypto::decrypt_json::<Value>(state.encryption_key(), &provider.encrypted_config)
            .map_err(|error| Error::internal().with_context(error.to_string()))?
    };

    let envelope = WebhookEnvelope::new(method.to_string(), path.clone(), header_map_to_strings(&headers), HashMap::new(), body.to_vec());

    let provider_ctx = ProviderContext {
        provider_id: provider.id,
        alias: provider.alias.clone(),
        config: provider_config,
        delivery: state.delivery().inner(),
    };

    let adapter = adapter_for(provider.provider_type);

    if let Some(early) = adapter
        .validate_webhook(&envelope, &provider_ctx)
        .await
        .map_err(|error| Error::internal().with_context(error.to_string()))?
    {
        return Ok(WebhookResponse::Early { status: early.status, body: early.body });
    }

    let matching_ids = adapter
        .process_webhook(&envelope, &provider_ctx, &candidates)
        .await
        .map_err(|error| Error::internal().with_context(error.to_string()))?;

    let matching: Vec<_> = candidates.into_iter().filter(|trigger| matching_ids.contains(&trigger.id)).collect();

    if matching.is_empty() {
        return Ok(WebhookResponse::NoMatch);
    }

    let first_workflow_id = matching[0].workflow_id;

    for trigger in matching {
        let state = state.clone();
        let method = method.to_string();
        let path = path.clone();
        let headers_value = header_map_to_json(&headers);
        let body_bytes = body.clone();

        tokio::spawn(async move {
            let Ok(mut conn) = state.pg_client().get_connection().await else {
                tracing::error!(target: crate::TRACING_TARGET_INGRESS, trigger_id = %trigger.id, "failed to acquire connection for dispatch");
                return;
            };

            let workflow = match conn.find_workflow_by_id(trigger.workflow_id).await {
                Ok(Some(workflow)) => workflow,
                Ok(None) => {
                    tracing::error!(target: crate::TRACING_TARGET_INGRESS, workflow_id = %trigger.workflow_id, "workflow not found for trigger");
                    return;
                }
                Err(error) => {
                    tracing::error!(target: crate::TRACING_TARGET_INGRESS, %error, "failed to load workflow for dispatch");
                    return;
                }
            };

            let body_value: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
            let event_data = floww_runtime::EventData::Webhook {
                method,
                path,
                headers: headers_value,
                body: body_value,
                query: Value::Object(Default::default()),
                params: Value::Object(Default::default()),
            };

            if let Err(error) = crate::dispatch::dispatch(&state, &trigger, &workflow, event_data).await {
                tracing::error!(target: crate::TRACING_TARGET_INGRESS, trigger_id = %trigger.id, %error, "dispatch failed");
            }
        });
    }

    Ok(WebhookResponse::Invoked(WebhookInvokedResponse { status: "invoked", workflow_id: first_workflow_id, webhook_id: webhook.id }))
}

fn header_map_to_strings(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|value| (name.to_string(), value.to_string())))
        .collect()
}

fn header_map_to_json(headers: &HeaderMap) -> Value {
    Value::Object(headers.iter().filter_map(|(name, value)| value.to_str().ok().map(|value| (name.to_string(), Value::String(value.to_string())))).collect())
}

fn handle_webhook_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Webhook event ingress")
        .description("Receives an inbound webhook, matches it against declared triggers, and dispatches matching ones.")
        .response::<200, Json<WebhookInvokedResponse>>()
        .response::<404, Json<ErrorResponse<'static>>>()
}

pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new().api_route("/webhook/{*path}", any_with(handle_webhook, handle_webhook_docs)).with_path_items(|item| item.tag("Webhooks"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_adds_leading_slash() {
        assert_eq!(normalize_path("abc/123"), "/abc/123");
    }

    #[test]
    fn normalize_path_strips_trailing_slash() {
        assert_eq!(normalize_path("/abc/123/"), "/abc/123");
    }

    #[test]
    fn normalize_path_is_idempotent() {
        let once = normalize_path("/abc/123/");
        assert_eq!(normalize_path(&once), once);
    }
}
