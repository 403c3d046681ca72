//! Provider repository for managing configured integration instances.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewProvider, Provider, UpdateProvider};
use crate::types::ProviderKind;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for provider database operations.
pub trait ProviderRepository {
    /// Creates a new provider.
    fn create_provider(&mut self, new_provider: NewProvider) -> impl Future<Output = PgResult<Provider>> + Send;

    /// Finds a provider by ID.
    fn find_provider_by_id(&mut self, provider_id: Uuid) -> impl Future<Output = PgResult<Option<Provider>>> + Send;

    /// Finds a provider by its namespace-scoped `(type, alias)` identity.
    fn find_provider_by_alias(
        &mut self,
        namespace_id: Uuid,
        provider_type: ProviderKind,
        alias: &str,
    ) -> impl Future<Output = PgResult<Option<Provider>>> + Send;

    /// Lists all providers in a namespace.
    fn list_providers(&mut self, namespace_id: Uuid) -> impl Future<Output = PgResult<Vec<Provider>>> + Send;

    /// Updates a provider's encrypted config.
    fn update_provider(&mut self, provider_id: Uuid, changes: UpdateProvider) -> impl Future<Output = PgResult<Provider>> + Send;

    /// Deletes a provider.
    fn delete_provider(&mut self, provider_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl ProviderRepository for PgConnection {
    async fn create_provider(&mut self, new_provider: NewProvider) -> PgResult<Provider> {
        use schema::providers;

        let provider = diesel::insert_into(providers::table)
            .values(&new_provider)
            .returning(Provider::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(provider)
    }

    async fn find_provider_by_id(&mut self, provider_id: Uuid) -> PgResult<Option<Provider>> {
        use schema::providers::dsl::*;

        let provider = providers
            .filter(id.eq(provider_id))
            .select(Provider::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(provider)
    }

    async fn find_provider_by_alias(
        &mut self,
        filter_namespace_id: Uuid,
        filter_provider_type: ProviderKind,
        filter_alias: &str,
    ) -> PgResult<Option<Provider>> {
        use schema::providers::dsl::*;

        let provider = providers
            .filter(namespace_id.eq(filter_namespace_id))
            .filter(provider_type.eq(filter_provider_type))
            .filter(alias.eq(filter_alias))
            .select(Provider::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(provider)
    }

    async fn list_providers(&mut self, filter_namespace_id: Uuid) -> PgResult<Vec<Provider>> {
        use schema::providers::dsl::*;

        let rows = providers
            .filter(namespace_id.eq(filter_namespace_id))
            .select(Provider::as_select())
            .order(created_at.desc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn update_provider(&mut self, provider_id: Uuid, changes: UpdateProvider) -> PgResult<Provider> {
        use schema::providers::dsl::*;

        let provider = diesel::update(providers)
            .filter(id.eq(provider_id))
            .set(&changes)
            .returning(Provider::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(provider)
    }

    async fn delete_provider(&mut self, provider_id: Uuid) -> PgResult<()> {
        use schema::providers::dsl::*;

        diesel::delete(providers)
            .filter(id.eq(provider_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
