//! Organization repository for managing organization operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{NewOrganization, Organization, UpdateOrganization};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for organization database operations.
pub trait OrganizationRepository {
    /// Creates a new organization.
    fn create_organization(&mut self, new_org: NewOrganization) -> impl Future<Output = PgResult<Organization>> + Send;

    /// Finds an organization by ID.
    fn find_organization_by_id(&mut self, org_id: Uuid) -> impl Future<Output = PgResult<Option<Organization>>> + Send;

    /// Updates an organization.
    fn update_organization(
        &mut self,
        org_id: Uuid,
        changes: UpdateOrganization,
    ) -> impl Future<Output = PgResult<Organization>> + Send;

    /// Soft deletes an organization.
    fn delete_organization(&mut self, org_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl OrganizationRepository for PgConnection {
    async fn create_organization(&mut self, new_org: NewOrganization) -> PgResult<Organization> {
        use schema::organizations;

        let org = diesel::insert_into(organizations::table)
            .values(&new_org)
            .returning(Organization::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(org)
    }

    async fn find_organization_by_id(&mut self, org_id: Uuid) -> PgResult<Option<Organization>> {
        use schema::organizations::dsl::*;

        let org = organizations
            .filter(id.eq(org_id))
            .filter(deleted_at.is_null())
            .select(Organization::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(org)
    }

    async fn update_organization(&mut self, org_id: Uuid, changes: UpdateOrganization) -> PgResult<Organization> {
        use schema::organizations::dsl::*;

        let org = diesel::update(organizations)
            .filter(id.eq(org_id))
            .set(&changes)
            .returning(Organization::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(org)
    }

    async fn delete_organization(&mut self, org_id: Uuid) -> PgResult<()> {
        use schema::organizations::dsl::*;

        diesel::update(organizations)
            .filter(id.eq(org_id))
            .set(deleted_at.eq(Some(jiff_diesel::Timestamp::from(Timestamp::now()))))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
