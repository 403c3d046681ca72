//! The `github` provider: dispatch by the `X-GitHub-Event` header.

use floww_postgres::model::Trigger;
use floww_postgres::types::ProviderKind;
use floww_webhook::{OutboundMethod, OutboundRequest};
use serde_json::Value;
use uuid::Uuid;

use crate::adapter::{Adapter, ProviderContext};
use crate::error::{ProviderError, ProviderResult};
use crate::utils::{RegisterWebhookRequest, TriggerUtils, WebhookOwner};

pub struct GithubAdapter;

fn trigger_type_for_event(event: &str) -> Option<&'static str> {
    match event {
        "push" => Some("onPush"),
        "pull_request" => Some("onPullRequest"),
        "issues" => Some("onIssue"),
        "issue_comment" => Some("onIssueComment"),
        "release" => Some("onRelease"),
        "ping" => None,
        _ => None,
    }
}

/// Matches `input.actions` (an array of allowed action strings) against the
/// event body's `action` field. Absent or empty means no filtering.
fn action_matches(input: &Value, body: &Value) -> bool {
    let Some(allowed) = input.get("actions").and_then(Value::as_array) else {
        return true;
    };
    if allowed.is_empty() {
        return true;
    }
    let Some(action) = body.get("action").and_then(Value::as_str) else {
        return false;
    };
    allowed.iter().any(|value| value.as_str() == Some(action))
}

/// Maps our trigger type back to the GitHub webhook event name subscribed at
/// hook-creation time.
fn github_event_for_trigger(trigger_type: &str) -> &'static str {
    match trigger_type {
        "onPush" => "push",
        "onPullRequest" => "pull_request",
        "onIssue" => "issues",
        "onIssueComment" => "issue_comment",
        "onRelease" => "release",
        _ => "push",
    }
}

fn repo_hook_url(server_url: &str, owner: &str, repository: &str, hook_id: Option<&str>) -> String {
    let base = server_url.trim_end_matches('/');
    match hook_id {
        Some(hook_id) => format!("{base}/repos/{owner}/{repository}/hooks/{hook_id}"),
        None => format!("{base}/repos/{owner}/{repository}/hooks"),
    }
}

fn auth_headers(provider: &ProviderContext) -> ProviderResult<(&str, &str)> {
    let server_url = provider.config.get("server_url").and_then(Value::as_str).unwrap_or("https://api.github.com");
    let access_token = provider.config.get("access_token").and_then(Value::as_str).ok_or_else(|| ProviderError::InvalidInput {
        trigger_type: "github".to_string(),
        message: "provider config is missing 'access_token'".to_string(),
    })?;
    Ok((server_url, access_token))
}

fn repo_identity<'a>(trigger_type: &str, input: &'a Value) -> ProviderResult<(&'a str, &'a str)> {
    let owner = input.get("owner").and_then(Value::as_str).ok_or_else(|| ProviderError::InvalidInput {
        trigger_type: trigger_type.to_string(),
        message: "input is missing 'owner'".to_string(),
    })?;
    let repository = input.get("repository").and_then(Value::as_str).ok_or_else(|| ProviderError::InvalidInput {
        trigger_type: trigger_type.to_string(),
        message: "input is missing 'repository'".to_string(),
    })?;
    Ok((owner, repository))
}

#[async_trait::async_trait]
impl Adapter for GithubAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Github
    }

    async fn create(&self, provider: &ProviderContext, trigger_type: &str, input: &Value, utils: &dyn TriggerUtils) -> ProviderResult<Value> {
        let (server_url, access_token) = auth_headers(provider)?;
        let (owner, repository) = repo_identity(trigger_type, input)?;

        let webhook = utils
            .register_webhook(RegisterWebhookRequest {
                path: None,
                method: Some("POST".to_string()),
                owner: WebhookOwner::Provider,
                reuse_existing: true,
            })
            .await?;

        let url = repo_hook_url(server_url, owner, repository, None);
        let request = OutboundRequest::new(
            url.parse().map_err(|error| ProviderError::Internal(format!("invalid github server_url: {error}")))?,
            OutboundMethod::Post,
        )
        .with_header("Authorization", format!("Bearer {access_token}"))
        .with_header("Accept", "application/vnd.github.v3+json")
        .with_json(serde_json::json!({
            "config": { "url": webhook.url, "content_type": "json", "insecure_ssl": "0" },
            "events": [github_event_for_trigger(trigger_type)],
            "active": true,
        }));

        let response = provider.delivery.deliver(&request).await?;
        let hook_id = response
            .body
            .as_ref()
            .and_then(|body| body.get("id"))
            .cloned()
            .ok_or_else(|| ProviderError::Internal("github hook creation response missing 'id'".to_string()))?;

        Ok(serde_json::json!({ "webhook_id": hook_id, "owner": owner, "repository": repository }))
    }

    async fn refresh(&self, provider: &ProviderContext, trigger_type: &str, input: &Value, state: &Value) -> ProviderResult<Value> {
        let (server_url, access_token) = auth_headers(provider)?;
        let (owner, repository) = repo_identity(trigger_type, input)?;
        let Some(hook_id) = state.get("webhook_id") else {
            return Ok(state.clone());
        };

        let url = repo_hook_url(server_url, owner, repository, Some(&hook_id.to_string()));
        let request = OutboundRequest::new(
            url.parse().map_err(|error| ProviderError::Internal(format!("invalid github server_url: {error}")))?,
            OutboundMethod::Get,
        )
        .with_header("Authorization", format!("Bearer {access_token}"))
        .with_header("Accept", "application/vnd.github.v3+json");

        provider.delivery.deliver(&request).await?;
        Ok(state.clone())
    }

    async fn destroy(&self, provider: &ProviderContext, trigger_type: &str, input: &Value, state: &Value, _utils: &dyn TriggerUtils) -> ProviderResult<()> {
        let (server_url, access_token) = auth_headers(provider)?;
        let (owner, repository) = repo_identity(trigger_type, input)?;
        let Some(hook_id) = state.get("webhook_id") else {
            return Ok(());
        };

        let url = repo_hook_url(server_url, owner, repository, Some(&hook_id.to_string()));
        let request = OutboundRequest::new(
            url.parse().map_err(|error| ProviderError::Internal(format!("invalid github server_url: {error}")))?,
            OutboundMethod::Delete,
        )
        .with_header("Authorization", format!("Bearer {access_token}"))
        .with_header("Accept", "application/vnd.github.v3+json");

        provider.delivery.deliver(&request).await?;
        Ok(())
    }

    async fn process_webhook(
        &self,
        envelope: &floww_webhook::WebhookEnvelope,
        _provider: &ProviderContext,
        candidates: &[Trigger],
    ) -> ProviderResult<Vec<Uuid>> {
        let Some(event) = envelope.header("x-github-event") else {
            return Ok(Vec::new());
        };
        let Some(trigger_type) = trigger_type_for_event(event) else {
            return Ok(Vec::new());
        };

        let body: Value = envelope.json()?;
        let repo = body.get("repository");
        let owner = repo.and_then(|repository| repository.get("owner")).and_then(|owner| owner.get("login"));
        let repo_name = repo.and_then(|repository| repository.get("name"));

        Ok(candidates
            .iter()
            .filter(|trigger| trigger.trigger_type == trigger_type)
            .filter(|trigger| super::filter_matches(&trigger.input, "owner", owner.unwrap_or(&Value::Null)))
            .filter(|trigger| super::filter_matches(&trigger.input, "repository", repo_name.unwrap_or(&Value::Null)))
            .filter(|trigger| action_matches(&trigger.input, &body))
            .map(|trigger| trigger.id)
            .collect())
    }
}
