//! Workflow model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::workflows;
use crate::types::{HasCreatedAt, HasDeletedAt, HasUpdatedAt};

/// A workflow definition: a named unit of deployable user code, scoped to a
/// namespace.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = workflows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Workflow {
    pub id: Uuid,
    pub namespace_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub trigger_metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new workflow.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = workflows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewWorkflow {
    pub namespace_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub trigger_metadata: Option<serde_json::Value>,
}

/// Data for updating a workflow.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = workflows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateWorkflow {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub trigger_metadata: Option<Option<serde_json::Value>>,
    pub deleted_at: Option<Option<Timestamp>>,
}

impl Workflow {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl HasCreatedAt for Workflow {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

impl HasUpdatedAt for Workflow {
    fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}

impl HasDeletedAt for Workflow {
    fn deleted_at(&self) -> Option<jiff::Timestamp> {
        self.deleted_at.map(Into::into)
    }
}
