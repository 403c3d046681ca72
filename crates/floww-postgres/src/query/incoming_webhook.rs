//! Incoming webhook repository for routing inbound HTTP requests.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{IncomingWebhook, NewIncomingWebhook};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for incoming webhook database operations.
pub trait IncomingWebhookRepository {
    /// Registers a new incoming webhook path.
    fn create_incoming_webhook(
        &mut self,
        new_webhook: NewIncomingWebhook,
    ) -> impl Future<Output = PgResult<IncomingWebhook>> + Send;

    /// Finds an incoming webhook by its path and method, the hot path hit on
    /// every inbound request before any trigger or provider lookup.
    fn find_incoming_webhook_by_path(
        &mut self,
        path: &str,
        method: &str,
    ) -> impl Future<Output = PgResult<Option<IncomingWebhook>>> + Send;

    /// Finds the provider-owned webhook for a provider, if one was already
    /// registered. Used by `registerWebhook`'s `reuseExisting` path so a
    /// provider with many triggers shares one inbound path.
    fn find_incoming_webhook_by_provider(&mut self, provider_id: Uuid) -> impl Future<Output = PgResult<Option<IncomingWebhook>>> + Send;

    /// Removes an incoming webhook registration.
    fn delete_incoming_webhook(&mut self, webhook_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl IncomingWebhookRepository for PgConnection {
    async fn create_incoming_webhook(&mut self, new_webhook: NewIncomingWebhook) -> PgResult<IncomingWebhook> {
        use schema::incoming_webhooks;

        let webhook = diesel::insert_into(incoming_webhooks::table)
            .values(&new_webhook)
            .returning(IncomingWebhook::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(webhook)
    }

    async fn find_incoming_webhook_by_path(&mut self, filter_path: &str, filter_method: &str) -> PgResult<Option<IncomingWebhook>> {
        use schema::incoming_webhooks::dsl::*;

        let webhook = incoming_webhooks
            .filter(path.eq(filter_path))
            .filter(method.eq(filter_method))
            .select(IncomingWebhook::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(webhook)
    }

    async fn find_incoming_webhook_by_provider(&mut self, filter_provider_id: Uuid) -> PgResult<Option<IncomingWebhook>> {
        use schema::incoming_webhooks::dsl::*;

        let webhook = incoming_webhooks
            .filter(provider_id.eq(filter_provider_id))
            .select(IncomingWebhook::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(webhook)
    }

    async fn delete_incoming_webhook(&mut self, webhook_id: Uuid) -> PgResult<()> {
        use schema::incoming_webhooks::dsl::*;

        diesel::delete(incoming_webhooks)
            .filter(id.eq(webhook_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
