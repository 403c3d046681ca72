//! Secret repository for managing namespace-scoped encrypted values.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewSecret, Secret, UpdateSecret};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for secret database operations.
pub trait SecretRepository {
    /// Creates a new secret.
    fn create_secret(&mut self, new_secret: NewSecret) -> impl Future<Output = PgResult<Secret>> + Send;

    /// Finds a secret by namespace and key.
    fn find_secret(&mut self, namespace_id: Uuid, key: &str) -> impl Future<Output = PgResult<Option<Secret>>> + Send;

    /// Lists all secrets in a namespace.
    fn list_secrets(&mut self, namespace_id: Uuid) -> impl Future<Output = PgResult<Vec<Secret>>> + Send;

    /// Updates a secret's encrypted value.
    fn update_secret(&mut self, secret_id: Uuid, changes: UpdateSecret) -> impl Future<Output = PgResult<Secret>> + Send;

    /// Deletes a secret.
    fn delete_secret(&mut self, secret_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl SecretRepository for PgConnection {
    async fn create_secret(&mut self, new_secret: NewSecret) -> PgResult<Secret> {
        use schema::secrets;

        let secret = diesel::insert_into(secrets::table)
            .values(&new_secret)
            .returning(Secret::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(secret)
    }

    async fn find_secret(&mut self, secret_namespace_id: Uuid, secret_key: &str) -> PgResult<Option<Secret>> {
        use schema::secrets::dsl::*;

        let secret = secrets
            .filter(namespace_id.eq(secret_namespace_id))
            .filter(key.eq(secret_key))
            .select(Secret::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(secret)
    }

    async fn list_secrets(&mut self, secret_namespace_id: Uuid) -> PgResult<Vec<Secret>> {
        use schema::secrets::dsl::*;

        let rows = secrets
            .filter(namespace_id.eq(secret_namespace_id))
            .select(Secret::as_select())
            .order(key.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn update_secret(&mut self, secret_id: Uuid, changes: UpdateSecret) -> PgResult<Secret> {
        use schema::secrets::dsl::*;

        let secret = diesel::update(secrets)
            .filter(id.eq(secret_id))
            .set(&changes)
            .returning(Secret::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(secret)
    }

    async fn delete_secret(&mut self, secret_id: Uuid) -> PgResult<()> {
        use schema::secrets::dsl::*;

        diesel::delete(secrets)
            .filter(id.eq(secret_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
