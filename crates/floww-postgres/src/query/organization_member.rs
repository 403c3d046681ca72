//! Organization member repository for managing membership operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewOrganizationMember, OrganizationMember, UpdateOrganizationMember};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for organization member database operations.
pub trait OrganizationMemberRepository {
    /// Adds a user to an organization.
    fn create_organization_member(
        &mut self,
        new_member: NewOrganizationMember,
    ) -> impl Future<Output = PgResult<OrganizationMember>> + Send;

    /// Lists members of an organization.
    fn list_organization_members(
        &mut self,
        org_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<OrganizationMember>>> + Send;

    /// Finds a specific membership row.
    fn find_organization_member(
        &mut self,
        org_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<OrganizationMember>>> + Send;

    /// Updates a member's role.
    fn update_organization_member(
        &mut self,
        member_id: Uuid,
        changes: UpdateOrganizationMember,
    ) -> impl Future<Output = PgResult<OrganizationMember>> + Send;

    /// Removes a user from an organization.
    fn delete_organization_member(&mut self, member_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl OrganizationMemberRepository for PgConnection {
    async fn create_organization_member(&mut self, new_member: NewOrganizationMember) -> PgResult<OrganizationMember> {
        use schema::organization_members;

        let member = diesel::insert_into(organization_members::table)
            .values(&new_member)
            .returning(OrganizationMember::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(member)
    }

    async fn list_organization_members(&mut self, org_id: Uuid) -> PgResult<Vec<OrganizationMember>> {
        use schema::organization_members::dsl::*;

        let members = organization_members
            .filter(organization_id.eq(org_id))
            .select(OrganizationMember::as_select())
            .order(created_at.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(members)
    }

    async fn find_organization_member(&mut self, org_id: Uuid, member_user_id: Uuid) -> PgResult<Option<OrganizationMember>> {
        use schema::organization_members::dsl::*;

        let member = organization_members
            .filter(organization_id.eq(org_id))
            .filter(user_id.eq(member_user_id))
            .select(OrganizationMember::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(member)
    }

    async fn update_organization_member(
        &mut self,
        member_id: Uuid,
        changes: UpdateOrganizationMember,
    ) -> PgResult<OrganizationMember> {
        use schema::organization_members::dsl::*;

        let member = diesel::update(organization_members)
            .filter(id.eq(member_id))
            .set(&changes)
            .returning(OrganizationMember::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(member)
    }

    async fn delete_organization_member(&mut self, member_id: Uuid) -> PgResult<()> {
        use schema::organization_members::dsl::*;

        diesel::delete(organization_members)
            .filter(id.eq(member_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
