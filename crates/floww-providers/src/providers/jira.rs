//! The `jira` provider: dispatch by the `webhookEvent` field.
//!
//! Jira only allows REST webhook management for Connect apps; with user API
//! token auth the webhook is registered by hand in the Jira admin UI, so
//! `create`/`destroy`/`refresh` only manage the local webhook row.

use floww_postgres::model::Trigger;
use floww_postgres::types::ProviderKind;
use serde_json::Value;
use uuid::Uuid;

use crate::adapter::{Adapter, ProviderContext};
use crate::error::ProviderResult;
use crate::utils::{RegisterWebhookRequest, TriggerUtils, WebhookOwner};

pub struct JiraAdapter;

fn trigger_type_for_event(event: &str) -> Option<&'static str> {
    match event {
        "jira:issue_created" => Some("onIssueCreated"),
        "jira:issue_updated" => Some("onIssueUpdated"),
        "comment_created" => Some("onCommentAdded"),
        _ => None,
    }
}

#[async_trait::async_trait]
impl Adapter for JiraAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Jira
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

    async fn process_webhook(
        &self,
        envelope: &floww_webhook::WebhookEnvelope,
        _provider: &ProviderContext,
        candidates: &[Trigger],
    ) -> ProviderResult<Vec<Uuid>> {
        let body: Value = envelope.json()?;
        let Some(event) = body.get("webhookEvent").and_then(Value::as_str) else {
            return Ok(Vec::new());
        };
        let Some(trigger_type) = trigger_type_for_event(event) else {
            return Ok(Vec::new());
        };

        let issue = body.get("issue");
        let project_key = issue
            .and_then(|issue| issue.get("fields"))
            .and_then(|fields| fields.get("project"))
            .and_then(|project| project.get("key"));
        let issue_type = issue
            .and_then(|issue| issue.get("fields"))
            .and_then(|fields| fields.get("issuetype"))
            .and_then(|issuetype| issuetype.get("name"));

        Ok(candidates
            .iter()
            .filter(|trigger| trigger.trigger_type == trigger_type)
            .filter(|trigger| super::filter_matches(&trigger.input, "project_key", project_key.unwrap_or(&Value::Null)))
            .filter(|trigger| super::filter_matches(&trigger.input, "issue_type", issue_type.unwrap_or(&Value::Null)))
            .map(|trigger| trigger.id)
            .collect())
    }
}
