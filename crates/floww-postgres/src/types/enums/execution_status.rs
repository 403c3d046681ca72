//! Execution history status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// State machine status of an [`ExecutionHistory`](crate::model::ExecutionHistory) row.
///
/// ```text
/// RECEIVED ──► STARTED ──► COMPLETED
///     │           │
///     │           └──► FAILED / TIMEOUT
///     └──► NO_DEPLOYMENT          (terminal)
/// ```
/// There are no backward transitions.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ExecutionStatus"]
pub enum ExecutionStatus {
    #[db_rename = "received"]
    #[serde(rename = "received")]
    #[default]
    Received,

    #[db_rename = "started"]
    #[serde(rename = "started")]
    Started,

    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    Completed,

    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    Failed,

    #[db_rename = "timeout"]
    #[serde(rename = "timeout")]
    Timeout,

    #[db_rename = "no_deployment"]
    #[serde(rename = "no_deployment")]
    NoDeployment,
}

impl ExecutionStatus {
    /// Returns whether this status is terminal (no further transitions occur).
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, ExecutionStatus::Received | ExecutionStatus::Started)
    }

    /// Returns whether this status represents a successful run.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, ExecutionStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_is_success() {
        assert!(ExecutionStatus::Completed.is_success());
        assert!(!ExecutionStatus::Failed.is_success());
    }

    #[test]
    fn received_and_started_are_non_terminal() {
        assert!(!ExecutionStatus::Received.is_terminal());
        assert!(!ExecutionStatus::Started.is_terminal());
        assert!(ExecutionStatus::NoDeployment.is_terminal());
        assert!(ExecutionStatus::Timeout.is_terminal());
    }
}
