//! Namespace model for PostgreSQL database operations.
//!
//! A namespace scopes every [`Provider`](super::Provider), [`Trigger`](super::Trigger),
//! [`Workflow`](super::Workflow) and [`Secret`](super::Secret). Ownership is
//! modeled as two nullable foreign keys rather than a pointer graph; a
//! `CHECK` constraint on the table enforces that exactly one is set, and
//! [`Namespace::owner`] turns the pair back into a [`floww_core::Owner`].

use diesel::prelude::*;
use floww_core::Owner;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::namespaces;
use crate::types::{HasCreatedAt, HasDeletedAt, HasUpdatedAt};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = namespaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Namespace {
    pub id: Uuid,
    pub name: String,
    pub owner_user_id: Option<Uuid>,
    pub owner_organization_id: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new namespace.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = namespaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewNamespace {
    pub name: String,
    pub owner_user_id: Option<Uuid>,
    pub owner_organization_id: Option<Uuid>,
}

impl NewNamespace {
    /// Builds insert data for a namespace owned by `owner`.
    pub fn for_owner(name: impl Into<String>, owner: Owner) -> Self {
        Self {
            name: name.into(),
            owner_user_id: owner.user_id(),
            owner_organization_id: owner.organization_id(),
        }
    }
}

/// Data for updating a namespace.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = namespaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateNamespace {
    pub name: Option<String>,
    pub deleted_at: Option<Option<Timestamp>>,
}

impl Namespace {
    /// Reconstructs the [`Owner`] sum type from the two nullable columns.
    ///
    /// Panics if neither or both columns are set; the table's `CHECK`
    /// constraint makes that state unreachable for rows read from the
    /// database.
    pub fn owner(&self) -> Owner {
        match (self.owner_user_id, self.owner_organization_id) {
            (Some(user_id), None) => Owner::User(user_id),
            (None, Some(org_id)) => Owner::Organization(org_id),
            other => panic!("namespace {} has invalid owner columns: {other:?}", self.id),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl HasCreatedAt for Namespace {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

impl HasUpdatedAt for Namespace {
    fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}

impl HasDeletedAt for Namespace {
    fn deleted_at(&self) -> Option<jiff::Timestamp> {
        self.deleted_at.map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_owner_sets_exactly_one_column() {
        let owner = Owner::Organization(Uuid::new_v4());
        let new_namespace = NewNamespace::for_owner("acme", owner);
        assert!(new_namespace.owner_user_id.is_none());
        assert_eq!(new_namespace.owner_organization_id, owner.organization_id());
    }
}
