//! The trigger lifecycle manager: reconciles a workflow's desired trigger
//! set against what is currently registered.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use floww_core::crypto::EncryptionKey;
use floww_postgres::model::{canonical_json, NewProvider, NewTrigger, Trigger, UpdateTriggerState};
use floww_postgres::query::{ProviderRepository, TriggerRepository};
use floww_postgres::types::ProviderKind;
use floww_postgres::PgClient;
use floww_scheduler::{JobCallback, JobStore};
use floww_webhook::OutboundDelivery;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::adapter::ProviderContext;
use crate::error::{ProviderError, ProviderResult, TriggerSyncFailure};
use crate::registry::adapter_for;
use crate::utils::DefaultTriggerUtils;

/// One entry in a workflow's desired trigger set, as declared by its
/// workflow definition (not yet materialized as a `Trigger` row).
#[derive(Debug, Clone)]
pub struct DesiredTrigger {
    pub provider_type: ProviderKind,
    pub provider_alias: String,
    pub trigger_type: String,
    pub input: Value,
}

/// `(provider_type, provider_alias, trigger_type, canonical_json(input))`:
/// the logical identity a trigger is diffed on.
pub type TriggerIdentity = (ProviderKind, String, String, String);

fn identity_of(provider_type: ProviderKind, provider_alias: &str, trigger_type: &str, input: &Value) -> TriggerIdentity {
    (provider_type, provider_alias.to_string(), trigger_type.to_string(), canonical_json(input))
}

/// The result of a [`sync`] call: every inbound webhook URL live for the
/// workflow afterward, plus any per-trigger failures from `toAdd`.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    pub webhook_urls: Vec<Url>,
    pub failures: Vec<TriggerSyncFailure>,
}

/// Everything [`sync`] needs beyond the desired set itself, grouped so the
/// call site doesn't thread seven positional arguments.
pub struct SyncContext {
    pub client: PgClient,
    pub job_store: Arc<dyn JobStore>,
    pub delivery: Arc<dyn OutboundDelivery>,
    pub public_base_url: Url,
    /// Decrypts `providers.encrypted_config` before it is handed to an
    /// adapter's `create`/`refresh`/`destroy`.
    pub encryption_key: Arc<EncryptionKey>,
    /// Builds the tick callback invoked when a recurring trigger fires,
    /// supplied by the caller since the business logic of executing a
    /// trigger lives outside this crate.
    pub make_callback: Arc<dyn Fn(Uuid) -> JobCallback + Send + Sync>,
}

/// Reconciles `desired` against the workflow's currently registered
/// triggers. See the module-level algorithm this mirrors: ensure providers
/// exist, diff identities into `toRemove`/`toAdd`/`toKeep`, apply each with
/// per-trigger failure isolation on `toAdd`, and aggregate failures into the
/// returned [`SyncOutcome`] rather than rolling back.
pub async fn sync(
    ctx: &SyncContext,
    workflow_id: Uuid,
    namespace_id: Uuid,
    desired: Vec<DesiredTrigger>,
    deployed_identities: &HashSet<TriggerIdentity>,
) -> ProviderResult<SyncOutcome> {
    let providers = ensure_providers(ctx, namespace_id, &desired).await?;

    let mut conn = ctx.client.get_connection().await?;
    let existing = conn.list_triggers_by_workflow(workflow_id).await?;

    let mut existing_map: HashMap<TriggerIdentity, Trigger> = HashMap::new();
    for trigger in existing {
        let provider = providers
            .values()
            .find(|provider| provider.id == trigger.provider_id)
            .ok_or_else(|| ProviderError::Internal(format!("trigger {} references an unknown provider", trigger.id)))?;
        let identity = identity_of(provider.provider_type, &provider.alias, &trigger.trigger_type, &trigger.input);
        existing_map.insert(identity, trigger);
    }

    let mut desired_map: HashMap<TriggerIdentity, &DesiredTrigger> = HashMap::new();
    for item in &desired {
        let identity = identity_of(item.provider_type, &item.provider_alias, &item.trigger_type, &item.input);
        desired_map.insert(identity, item);
    }

    let existing_keys: HashSet<&TriggerIdentity> = existing_map.keys().collect();
    let desired_keys: HashSet<&TriggerIdentity> = desired_map.keys().collect();

    let to_remove: Vec<TriggerIdentity> = existing_keys
        .iter()
        .filter(|identity| !desired_keys.contains(*identity) && !deployed_identities.contains(**identity))
        .map(|identity| (**identity).clone())
        .collect();
    let to_add: Vec<TriggerIdentity> = desired_keys
        .iter()
        .filter(|identity| !existing_keys.contains(*identity))
        .map(|identity| (**identity).clone())
        .collect();
    let to_keep: Vec<TriggerIdentity> = existing_keys
        .iter()
        .filter(|identity| desired_keys.contains(*identity))
        .map(|identity| (**identity).clone())
        .collect();

    let mut outcome = SyncOutcome::default();

    for identity in &to_remove {
        let trigger = existing_map.get(identity).expect("identity drawn from existing_map").clone();
        let provider = providers.get(&(identity.0, identity.1.clone())).expect("provider resolved above");
        let adapter = adapter_for(identity.0);
        let provider_ctx = provider_context(provider, ctx)?;
        let utils = trigger_utils(ctx, workflow_id, trigger.id, provider.id);

        let state = trigger.state.clone().unwrap_or(Value::Null);
        adapter.destroy(&provider_ctx, &identity.2, &trigger.input, &state, &utils).await?;
        conn.delete_trigger(trigger.id).await?;
    }

    for identity in &to_add {
        let item = desired_map.get(identity).expect("identity drawn from desired_map");
        let provider = providers.get(&(identity.0, identity.1.clone())).expect("provider resolved above");

        let placeholder = conn
            .create_trigger(NewTrigger::new(workflow_id, provider.id, item.trigger_type.clone(), item.input.clone()))
            .await?;

        let adapter = adapter_for(identity.0);
        let provider_ctx = match provider_context(provider, ctx) {
            Ok(provider_ctx) => provider_ctx,
            Err(error) => {
                conn.delete_trigger(placeholder.id).await?;
                outcome.failures.push(TriggerSyncFailure {
                    trigger_type: item.trigger_type.clone(),
                    error: error.to_string(),
                });
                continue;
            }
        };
        let utils = trigger_utils(ctx, workflow_id, placeholder.id, provider.id);

        match adapter.create(&provider_ctx, &item.trigger_type, &item.input, &utils).await {
            Ok(state) => {
                if let Some(url) = state_webhook_url(ctx, &state) {
                    outcome.webhook_urls.push(url);
                }
                conn.update_trigger_state(placeholder.id, UpdateTriggerState { state: Some(Some(state)) }).await?;
            }
            Err(error) => {
                conn.delete_trigger(placeholder.id).await?;
                outcome.failures.push(TriggerSyncFailure {
                    trigger_type: item.trigger_type.clone(),
                    error: error.to_string(),
                });
            }
        }
    }

    for identity in &to_keep {
        let trigger = existing_map.get(identity).expect("identity drawn from existing_map").clone();
        let provider = providers.get(&(identity.0, identity.1.clone())).expect("provider resolved above");
        let adapter = adapter_for(identity.0);
        let provider_ctx = provider_context(provider, ctx)?;
        let state = trigger.state.clone().unwrap_or(Value::Null);

        let refreshed = adapter.refresh(&provider_ctx, &identity.2, &trigger.input, &state).await?;
        conn.update_trigger_state(trigger.id, UpdateTriggerState { state: Some(Some(refreshed)) }).await?;
    }

    Ok(outcome)
}

/// Decrypts `provider.encrypted_config` (empty ciphertext decrypts to
/// `Value::Null`, mirroring providers with no setup steps) and builds the
/// context handed to an adapter's reconcile methods.
fn provider_context(provider: &floww_postgres::model::Provider, ctx: &SyncContext) -> ProviderResult<ProviderContext> {
    let config = if provider.encrypted_config.is_empty() {
        Value::Null
    } else {
        floww_core::crypto::decrypt_json::<Value>(&ctx.encryption_key, &provider.encrypted_config).map_err(ProviderError::Decryption)?
    };

    Ok(ProviderContext {
        provider_id: provider.id,
        alias: provider.alias.clone(),
        config,
        delivery: ctx.delivery.clone(),
    })
}

fn trigger_utils(ctx: &SyncContext, workflow_id: Uuid, trigger_id: Uuid, provider_id: Uuid) -> DefaultTriggerUtils {
    DefaultTriggerUtils {
        client: ctx.client.clone(),
        job_store: ctx.job_store.clone(),
        public_base_url: ctx.public_base_url.clone(),
        workflow_id,
        trigger_id,
        provider_id,
        make_callback: ctx.make_callback.clone(),
    }
}

/// Extracts a webhook URL from a newly persisted trigger state, if the
/// adapter's `create` registered one (`state.url`, or `state.path` relative
/// to the public base URL).
fn state_webhook_url(ctx: &SyncContext, state: &Value) -> Option<Url> {
    if let Some(full) = state.get("url").and_then(Value::as_str) {
        if let Ok(url) = full.parse() {
            return Some(url);
        }
    }

    let path = state.get("path")?.as_str()?;
    let mut base = ctx.public_base_url.clone();
    base.set_path(path);
    Some(base)
}

/// Ensures every provider referenced by `desired` exists: no-setup-steps
/// types (`builtin`, `kvstore`) are auto-created, everything else must
/// already exist or the whole sync fails fast.
async fn ensure_providers(
    ctx: &SyncContext,
    namespace_id: Uuid,
    desired: &[DesiredTrigger],
) -> ProviderResult<HashMap<(ProviderKind, String), floww_postgres::model::Provider>> {
    let mut conn = ctx.client.get_connection().await?;
    let mut resolved = HashMap::new();

    let mut distinct: Vec<(ProviderKind, String)> = Vec::new();
    for item in desired {
        let key = (item.provider_type, item.provider_alias.clone());
        if !distinct.contains(&key) {
            distinct.push(key);
        }
    }

    for (provider_type, alias) in distinct {
        if let Some(provider) = conn.find_provider_by_alias(namespace_id, provider_type, &alias).await? {
            resolved.insert((provider_type, alias), provider);
            continue;
        }

        if !provider_type.has_no_setup_steps() {
            return Err(ProviderError::ProviderNotFound { provider_type, alias });
        }

        let provider = conn.create_provider(NewProvider::auto_created(namespace_id, provider_type, alias.clone())).await?;
        resolved.insert((provider_type, alias), provider);
    }

    Ok(resolved)
}
