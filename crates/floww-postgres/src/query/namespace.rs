//! Namespace repository for managing namespace operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use floww_core::Owner;
use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{NewNamespace, Namespace, UpdateNamespace};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for namespace database operations.
pub trait NamespaceRepository {
    /// Creates a new namespace.
    fn create_namespace(&mut self, new_namespace: NewNamespace) -> impl Future<Output = PgResult<Namespace>> + Send;

    /// Finds a namespace by ID.
    fn find_namespace_by_id(&mut self, namespace_id: Uuid) -> impl Future<Output = PgResult<Option<Namespace>>> + Send;

    /// Lists namespaces owned by a user or organization.
    fn list_namespaces_for_owner(&mut self, owner: Owner) -> impl Future<Output = PgResult<Vec<Namespace>>> + Send;

    /// Updates a namespace.
    fn update_namespace(
        &mut self,
        namespace_id: Uuid,
        changes: UpdateNamespace,
    ) -> impl Future<Output = PgResult<Namespace>> + Send;

    /// Soft deletes a namespace.
    fn delete_namespace(&mut self, namespace_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl NamespaceRepository for PgConnection {
    async fn create_namespace(&mut self, new_namespace: NewNamespace) -> PgResult<Namespace> {
        use schema::namespaces;

        let namespace = diesel::insert_into(namespaces::table)
            .values(&new_namespace)
            .returning(Namespace::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(namespace)
    }

    async fn find_namespace_by_id(&mut self, namespace_id: Uuid) -> PgResult<Option<Namespace>> {
        use schema::namespaces::dsl::*;

        let namespace = namespaces
            .filter(id.eq(namespace_id))
            .filter(deleted_at.is_null())
            .select(Namespace::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(namespace)
    }

    async fn list_namespaces_for_owner(&mut self, owner: Owner) -> PgResult<Vec<Namespace>> {
        use schema::namespaces::dsl::*;

        let query = namespaces.filter(deleted_at.is_null()).into_boxed();
        let query = match owner {
            Owner::User(user) => query.filter(owner_user_id.eq(user)),
            Owner::Organization(org) => query.filter(owner_organization_id.eq(org)),
        };

        let rows = query
            .select(Namespace::as_select())
            .order(created_at.desc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn update_namespace(&mut self, namespace_id: Uuid, changes: UpdateNamespace) -> PgResult<Namespace> {
        use schema::namespaces::dsl::*;

        let namespace = diesel::update(namespaces)
            .filter(id.eq(namespace_id))
            .set(&changes)
            .returning(Namespace::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(namespace)
    }

    async fn delete_namespace(&mut self, namespace_id: Uuid) -> PgResult<()> {
        use schema::namespaces::dsl::*;

        diesel::update(namespaces)
            .filter(id.eq(namespace_id))
            .set(deleted_at.eq(Some(jiff_diesel::Timestamp::from(Timestamp::now()))))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
