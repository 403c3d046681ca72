//! Workflow deployment status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle status of a [`WorkflowDeployment`](crate::model::WorkflowDeployment).
///
/// At most one deployment per workflow may be `Active`; the dispatcher
/// selects the most recently deployed one of those.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::DeploymentStatus"]
pub enum DeploymentStatus {
    #[db_rename = "active"]
    #[serde(rename = "active")]
    #[default]
    Active,

    #[db_rename = "inactive"]
    #[serde(rename = "inactive")]
    Inactive,

    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    Failed,
}

impl DeploymentStatus {
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, DeploymentStatus::Active)
    }
}
