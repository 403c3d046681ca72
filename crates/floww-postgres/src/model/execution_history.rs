//! Execution history model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::execution_history;
use crate::types::{ExecutionStatus, HasCreatedAt};

/// One attempt to run a workflow in response to a fired trigger.
///
/// Rows only move forward through [`ExecutionStatus`]:
/// `Received -> Started -> {Completed, Failed, Timeout}`, or
/// `Received -> NoDeployment` when no active deployment existed at receipt.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = execution_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExecutionHistory {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub trigger_id: Uuid,
    pub deployment_id: Option<Uuid>,
    pub status: ExecutionStatus,
    pub received_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub error_message: Option<String>,
    pub error_stack: Option<String>,
    pub logs: Option<serde_json::Value>,
}

/// Data for recording a newly received trigger fire.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = execution_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewExecutionHistory {
    pub workflow_id: Uuid,
    pub trigger_id: Uuid,
    pub deployment_id: Option<Uuid>,
    pub status: ExecutionStatus,
    pub received_at: Timestamp,
}

impl NewExecutionHistory {
    /// A trigger fired and was dispatched against `deployment_id`.
    pub fn received(workflow_id: Uuid, trigger_id: Uuid, deployment_id: Uuid, received_at: Timestamp) -> Self {
        Self {
            workflow_id,
            trigger_id,
            deployment_id: Some(deployment_id),
            status: ExecutionStatus::Received,
            received_at,
        }
    }

    /// A trigger fired but the workflow had no active deployment.
    pub fn no_deployment(workflow_id: Uuid, trigger_id: Uuid, received_at: Timestamp) -> Self {
        Self {
            workflow_id,
            trigger_id,
            deployment_id: None,
            status: ExecutionStatus::NoDeployment,
            received_at,
        }
    }
}

/// Data for transitioning an execution to `Started`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = execution_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MarkExecutionStarted {
    pub status: ExecutionStatus,
    pub started_at: Timestamp,
}

impl MarkExecutionStarted {
    pub fn at(started_at: Timestamp) -> Self {
        Self {
            status: ExecutionStatus::Started,
            started_at,
        }
    }
}

/// Data for transitioning an execution to a terminal status
/// (`Completed`, `Failed`, or `Timeout`).
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = execution_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MarkExecutionFinished {
    pub status: ExecutionStatus,
    pub completed_at: Timestamp,
    pub error_message: Option<String>,
    pub error_stack: Option<String>,
    pub logs: Option<serde_json::Value>,
}

impl MarkExecutionFinished {
    pub fn completed(completed_at: Timestamp, logs: Option<serde_json::Value>) -> Self {
        Self {
            status: ExecutionStatus::Completed,
            completed_at,
            error_message: None,
            error_stack: None,
            logs,
        }
    }

    pub fn failed(completed_at: Timestamp, error_message: String, error_stack: Option<String>, logs: Option<serde_json::Value>) -> Self {
        Self {
            status: ExecutionStatus::Failed,
            completed_at,
            error_message: Some(error_message),
            error_stack,
            logs,
        }
    }

    pub fn timed_out(completed_at: Timestamp) -> Self {
        Self {
            status: ExecutionStatus::Timeout,
            completed_at,
            error_message: None,
            error_stack: None,
            logs: None,
        }
    }
}

impl ExecutionHistory {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

impl HasCreatedAt for ExecutionHistory {
    fn created_at(&self) -> jiff::Timestamp {
        self.received_at.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn received_sets_deployment_id() {
        let workflow_id = Uuid::now_v7();
        let trigger_id = Uuid::now_v7();
        let deployment_id = Uuid::now_v7();
        let now = Timestamp::from(jiff::Timestamp::now());
        let row = NewExecutionHistory::received(workflow_id, trigger_id, deployment_id, now);
        assert_eq!(row.deployment_id, Some(deployment_id));
        assert_eq!(row.status, ExecutionStatus::Received);
    }

    #[test]
    fn no_deployment_leaves_deployment_id_empty() {
        let workflow_id = Uuid::now_v7();
        let trigger_id = Uuid::now_v7();
        let now = Timestamp::from(jiff::Timestamp::now());
        let row = NewExecutionHistory::no_deployment(workflow_id, trigger_id, now);
        assert_eq!(row.deployment_id, None);
        assert_eq!(row.status, ExecutionStatus::NoDeployment);
    }
}
