//! Organization membership model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::organization_members;
use crate::types::{HasCreatedAt, OrganizationRole};

/// A user's membership in an organization, carrying its role.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = organization_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrganizationMember {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: OrganizationRole,
    pub created_at: Timestamp,
}

/// Data for creating a new organization membership.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organization_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewOrganizationMember {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: OrganizationRole,
}

/// Data for updating an organization membership's role.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = organization_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateOrganizationMember {
    pub role: Option<OrganizationRole>,
}

impl HasCreatedAt for OrganizationMember {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}
