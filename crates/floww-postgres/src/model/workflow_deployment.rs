//! Workflow deployment model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::workflow_deployments;
use crate::types::{DeploymentStatus, HasCreatedAt};

/// An immutable, deployed snapshot of a workflow's user code and runtime.
///
/// At most one row per `workflow_id` may have `status = Active`; callers must
/// enforce this by deactivating the previous active deployment in the same
/// transaction as activating a new one.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = workflow_deployments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkflowDeployment {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub runtime_id: Uuid,
    /// Map of filename to source, as deployed.
    pub source_files: serde_json::Value,
    pub entrypoint: String,
    pub status: DeploymentStatus,
    /// Snapshot of `{provider: {type, alias}, triggerType, input}` entries
    /// materialized by this deployment; consumed by the lifecycle manager to
    /// protect against removal of the active deployment's triggers.
    pub trigger_definitions: serde_json::Value,
    pub deployer_principal: Option<String>,
    pub deployed_at: Timestamp,
    pub created_at: Timestamp,
}

/// Data for creating a new deployment.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workflow_deployments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewWorkflowDeployment {
    pub workflow_id: Uuid,
    pub runtime_id: Uuid,
    pub source_files: serde_json::Value,
    pub entrypoint: String,
    pub status: DeploymentStatus,
    pub trigger_definitions: serde_json::Value,
    pub deployer_principal: Option<String>,
    pub deployed_at: Timestamp,
}

/// Data for transitioning a deployment's status.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = workflow_deployments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateWorkflowDeploymentStatus {
    pub status: DeploymentStatus,
}

impl WorkflowDeployment {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

impl HasCreatedAt for WorkflowDeployment {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}
