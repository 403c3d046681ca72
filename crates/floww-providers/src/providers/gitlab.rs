//! The `gitlab` provider: one provider-owned webhook per configured
//! project/group, fanning out to triggers by `event_type`.

use floww_postgres::model::Trigger;
use floww_postgres::types::ProviderKind;
use floww_webhook::{OutboundMethod, OutboundRequest};
use serde_json::Value;
use uuid::Uuid;

use crate::adapter::{Adapter, ProviderContext};
use crate::error::{ProviderError, ProviderResult};
use crate::utils::{RegisterWebhookRequest, TriggerUtils, WebhookOwner};

pub struct GitlabAdapter;

/// Resolves the GitLab `hooks` collection URL for a project- or group-scoped
/// webhook, and (for `destroy`/`refresh`) the single-hook URL.
fn hooks_url(base_url: &str, input: &Value, state: &Value, hook_id: Option<&str>) -> ProviderResult<String> {
    let project_id = input.get("projectId").and_then(Value::as_str).or_else(|| state.get("project_id").and_then(Value::as_str));
    let group_id = input.get("groupId").and_then(Value::as_str).or_else(|| state.get("group_id").and_then(Value::as_str));

    let base = base_url.trim_end_matches('/');
    let (scope, id) = match (project_id, group_id) {
        (Some(project_id), _) => ("projects", project_id),
        (_, Some(group_id)) => ("groups", group_id),
        (None, None) => {
            return Err(ProviderError::InvalidInput {
                trigger_type: "onMergeRequestComment".to_string(),
                message: "either projectId or groupId must be set".to_string(),
            });
        }
    };

    Ok(match hook_id {
        Some(hook_id) => format!("{base}/api/v4/{scope}/{id}/hooks/{hook_id}"),
        None => format!("{base}/api/v4/{scope}/{id}/hooks"),
    })
}

fn auth_headers(provider: &ProviderContext) -> ProviderResult<(&str, &str)> {
    let url = provider.config.get("url").and_then(Value::as_str).ok_or_else(|| ProviderError::InvalidInput {
        trigger_type: "gitlab".to_string(),
        message: "provider config is missing 'url'".to_string(),
    })?;
    let access_token = provider.config.get("accessToken").and_then(Value::as_str).ok_or_else(|| ProviderError::InvalidInput {
        trigger_type: "gitlab".to_string(),
        message: "provider config is missing 'accessToken'".to_string(),
    })?;
    Ok((url, access_token))
}

#[async_trait::async_trait]
impl Adapter for GitlabAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gitlab
    }

    async fn create(&self, provider: &ProviderContext, trigger_type: &str, input: &Value, utils: &dyn TriggerUtils) -> ProviderResult<Value> {
        let (url, access_token) = auth_headers(provider)?;
        let webhook = utils
            .register_webhook(RegisterWebhookRequest {
                path: None,
                method: Some("POST".to_string()),
                owner: WebhookOwner::Provider,
                reuse_existing: true,
            })
            .await?;

        let target = hooks_url(url, input, &Value::Null, None)?;
        let request = OutboundRequest::new(target.parse().map_err(|error| ProviderError::InvalidInput {
            trigger_type: trigger_type.to_string(),
            message: format!("invalid provider url: {error}"),
        })?, OutboundMethod::Post)
        .with_header("PRIVATE-TOKEN", access_token)
        .with_json(serde_json::json!({
            "url": webhook.url,
            "note_events": true,
            "merge_requests_events": true,
            "push_events": false,
            "issues_events": false,
        }));

        let response = provider.delivery.deliver(&request).await?;
        let hook_id = response.body.as_ref().and_then(|body| body.get("id")).cloned().ok_or_else(|| ProviderError::Internal("gitlab hook creation response missing 'id'".to_string()))?;

        let mut state = serde_json::json!({ "webhook_id": hook_id, "path": webhook.path });
        if let Some(project_id) = input.get("projectId") {
            state["project_id"] = project_id.clone();
        }
        if let Some(group_id) = input.get("groupId") {
            state["group_id"] = group_id.clone();
        }
        Ok(state)
    }

    async fn refresh(&self, provider: &ProviderContext, trigger_type: &str, input: &Value, state: &Value) -> ProviderResult<Value> {
        let (url, access_token) = auth_headers(provider)?;
        let Some(hook_id) = state.get("webhook_id") else {
            return Ok(state.clone());
        };

        let target = hooks_url(url, input, state, Some(&hook_id.to_string()))?;
        let request = OutboundRequest::new(target.parse().map_err(|error| ProviderError::InvalidInput {
            trigger_type: trigger_type.to_string(),
            message: format!("invalid provider url: {error}"),
        })?, OutboundMethod::Get)
        .with_header("PRIVATE-TOKEN", access_token);

        provider.delivery.deliver(&request).await?;
        Ok(state.clone())
    }

    async fn destroy(&self, provider: &ProviderContext, _trigger_type: &str, input: &Value, state: &Value, _utils: &dyn TriggerUtils) -> ProviderResult<()> {
        let (url, access_token) = auth_headers(provider)?;
        let Some(hook_id) = state.get("webhook_id") else {
            return Ok(());
        };

        let target = hooks_url(url, input, state, Some(&hook_id.to_string()))?;
        let request = OutboundRequest::new(target.parse().map_err(|error| ProviderError::Internal(format!("invalid provider url: {error}")))?, OutboundMethod::Delete)
            .with_header("PRIVATE-TOKEN", access_token);

        provider.delivery.deliver(&request).await?;
        Ok(())
    }

    async fn process_webhook(
        &self,
        envelope: &floww_webhook::WebhookEnvelope,
        _provider: &ProviderContext,
        candidates: &[Trigger],
    ) -> ProviderResult<Vec<Uuid>> {
        let body: Value = envelope.json()?;
        let Some(event_type) = body.get("event_type").and_then(Value::as_str) else {
            return Ok(Vec::new());
        };

        Ok(candidates
            .iter()
            .filter(|trigger| trigger.trigger_type == event_type)
            .filter(|trigger| super::filter_matches(&trigger.input, "projectId", body.get("project_id").unwrap_or(&Value::Null)))
            .filter(|trigger| super::filter_matches(&trigger.input, "groupId", body.get("group_id").unwrap_or(&Value::Null)))
            .map(|trigger| trigger.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use floww_webhook::{DeliveryResponse, OutboundDelivery, Result as WebhookResult};

    use super::*;
    use crate::utils::{RegisterWebhookRequest, RegisteredWebhook, TriggerUtils};

    #[derive(Default)]
    struct FakeDelivery {
        requests: Mutex<Vec<OutboundRequest>>,
    }

    #[async_trait::async_trait]
    impl OutboundDelivery for FakeDelivery {
        async fn deliver(&self, request: &OutboundRequest) -> WebhookResult<DeliveryResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(DeliveryResponse::new(request.request_id, 204, jiff::Timestamp::now(), None))
        }

        async fn health_check(&self) -> WebhookResult<floww_core::ServiceHealth> {
            unimplemented!("not exercised by these tests")
        }
    }

    struct NoopTriggerUtils;

    #[async_trait::async_trait]
    impl TriggerUtils for NoopTriggerUtils {
        async fn register_webhook(&self, _request: RegisterWebhookRequest) -> ProviderResult<RegisteredWebhook> {
            unimplemented!("not exercised by these tests")
        }

        async fn register_recurring_task(&self, _schedule: floww_scheduler::JobSchedule) -> ProviderResult<Uuid> {
            unimplemented!("not exercised by these tests")
        }

        async fn unregister_recurring_task(&self) -> ProviderResult<()> {
            unimplemented!("not exercised by these tests")
        }
    }

    fn provider_ctx(delivery: std::sync::Arc<FakeDelivery>) -> ProviderContext {
        ProviderContext {
            provider_id: Uuid::now_v7(),
            alias: "main".to_string(),
            config: serde_json::json!({"url": "https://gitlab.example.com", "accessToken": "token-123"}),
            delivery,
        }
    }

    #[tokio::test]
    async fn destroy_deletes_the_hook_exactly_once() {
        let delivery = std::sync::Arc::new(FakeDelivery::default());
        let ctx = provider_ctx(delivery.clone());
        let input = serde_json::json!({"projectId": "42"});
        let state = serde_json::json!({"webhook_id": 999, "project_id": "42"});

        GitlabAdapter.destroy(&ctx, "onMergeRequestComment", &input, &state, &NoopTriggerUtils).await.unwrap();

        let requests = delivery.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, OutboundMethod::Delete);
        assert_eq!(requests[0].url.as_str(), "https://gitlab.example.com/api/v4/projects/42/hooks/999");
    }

    #[tokio::test]
    async fn destroy_is_a_noop_without_a_recorded_webhook_id() {
        let delivery = std::sync::Arc::new(FakeDelivery::default());
        let ctx = provider_ctx(delivery.clone());
        let input = serde_json::json!({"projectId": "42"});

        GitlabAdapter.destroy(&ctx, "onMergeRequestComment", &input, &Value::Null, &NoopTriggerUtils).await.unwrap();

        assert!(delivery.requests.lock().unwrap().is_empty());
    }
}
