//! The `utils` capability object passed to adapters' Reconcile API calls.

use std::sync::Arc;

use floww_postgres::model::{NewIncomingWebhook, NewRecurringTask};
use floww_postgres::query::{IncomingWebhookRepository, RecurringTaskRepository};
use floww_postgres::PgClient;
use floww_scheduler::{JobCallback, JobSchedule, JobStore};
use url::Url;
use uuid::Uuid;

use crate::error::{ProviderError, ProviderResult};

/// Whether a registered webhook path belongs to a single trigger or is
/// shared across every trigger on a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOwner {
    Trigger,
    Provider,
}

/// Parameters for [`TriggerUtils::register_webhook`].
#[derive(Debug, Clone, Default)]
pub struct RegisterWebhookRequest {
    /// An explicit path suffix. Normalized to `/webhook/<workflow_id>/<rest>`
    /// if given; otherwise a random path is minted.
    pub path: Option<String>,
    /// The HTTP method the webhook is registered for. Defaults to `POST`.
    pub method: Option<String>,
    pub owner: WebhookOwner,
    /// When `true` and `owner == Provider`, reuses an existing provider-
    /// owned webhook rather than registering a new one.
    pub reuse_existing: bool,
}

impl Default for WebhookOwner {
    fn default() -> Self {
        WebhookOwner::Trigger
    }
}

/// A registered inbound webhook path, as returned to the calling adapter.
#[derive(Debug, Clone)]
pub struct RegisteredWebhook {
    pub id: Uuid,
    pub url: Url,
    pub path: String,
    pub method: String,
}

/// The capability object passed to `Adapter::create`/`destroy`, scoped to a
/// single trigger being reconciled.
///
/// Deliberately narrow: an adapter can register or unregister the inbound
/// paths and scheduler jobs it owns, but cannot reach any other part of the
/// registry.
#[async_trait::async_trait]
pub trait TriggerUtils: Send + Sync {
    async fn register_webhook(&self, request: RegisterWebhookRequest) -> ProviderResult<RegisteredWebhook>;

    async fn register_recurring_task(&self, schedule: JobSchedule) -> ProviderResult<Uuid>;

    async fn unregister_recurring_task(&self) -> ProviderResult<()>;
}

/// The production [`TriggerUtils`] implementation, scoped to one trigger
/// being created or destroyed during [`crate::lifecycle::sync`].
pub struct DefaultTriggerUtils {
    pub(crate) client: PgClient,
    pub(crate) job_store: Arc<dyn JobStore>,
    pub(crate) public_base_url: Url,
    pub(crate) workflow_id: Uuid,
    pub(crate) trigger_id: Uuid,
    pub(crate) provider_id: Uuid,
    /// Builds the tick callback for this trigger, supplied by the caller
    /// (the cron-invocation business logic lives outside this crate).
    pub(crate) make_callback: Arc<dyn Fn(Uuid) -> JobCallback + Send + Sync>,
}

impl DefaultTriggerUtils {
    fn webhook_url(&self, path: &str) -> Url {
        let mut url = self.public_base_url.clone();
        url.set_path(path);
        url
    }
}

#[async_trait::async_trait]
impl TriggerUtils for DefaultTriggerUtils {
    async fn register_webhook(&self, request: RegisterWebhookRequest) -> ProviderResult<RegisteredWebhook> {
        let method = request.method.unwrap_or_else(|| "POST".to_string());
        let mut conn = self.client.get_connection().await?;

        if request.reuse_existing && request.owner == WebhookOwner::Provider {
            if let Some(existing) = conn.find_incoming_webhook_by_provider(self.provider_id).await? {
                return Ok(RegisteredWebhook {
                    id: existing.id,
                    url: self.webhook_url(&existing.path),
                    path: existing.path,
                    method: existing.method,
                });
            }
        }

        let path = match request.path {
            Some(explicit) => {
                let rest = explicit.strip_prefix('/').unwrap_or(&explicit);
                let rest = rest.strip_prefix("webhook/").unwrap_or(rest);
                format!("/webhook/{}/{}", self.workflow_id, rest)
            }
            None => format!("/webhook/{}", Uuid::now_v7()),
        };

        let new_webhook = match request.owner {
            WebhookOwner::Trigger => NewIncomingWebhook::for_trigger(path.clone(), method.clone(), self.trigger_id),
            WebhookOwner::Provider => NewIncomingWebhook::for_provider(path.clone(), method.clone(), self.provider_id),
        };

        let webhook = conn.create_incoming_webhook(new_webhook).await?;

        Ok(RegisteredWebhook {
            id: webhook.id,
            url: self.webhook_url(&webhook.path),
            path: webhook.path,
            method: webhook.method,
        })
    }

    async fn register_recurring_task(&self, schedule: JobSchedule) -> ProviderResult<Uuid> {
        let mut conn = self.client.get_connection().await?;
        let task = conn
            .create_recurring_task(NewRecurringTask {
                trigger_id: self.trigger_id,
            })
            .await?;

        let job_id = floww_scheduler::recurring_task_job_id(self.trigger_id);
        let callback = (self.make_callback)(self.trigger_id);
        self.job_store
            .add_job(&job_id, schedule, callback)
            .await
            .map_err(|error| ProviderError::Internal(error.to_string()))?;

        Ok(task.id)
    }

    async fn unregister_recurring_task(&self) -> ProviderResult<()> {
        let job_id = floww_scheduler::recurring_task_job_id(self.trigger_id);
        self.job_store
            .remove_job(&job_id)
            .await
            .map_err(|error| ProviderError::Internal(error.to_string()))?;

        let mut conn = self.client.get_connection().await?;
        conn.delete_recurring_task(self.trigger_id).await?;
        Ok(())
    }
}
