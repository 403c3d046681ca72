//! Runtime provisioning status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Provisioning status of a [`Runtime`](crate::model::Runtime), as reported by
/// the runtime backend (`floww-runtime`).
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::RuntimeStatus"]
pub enum RuntimeStatus {
    #[db_rename = "in_progress"]
    #[serde(rename = "in_progress")]
    #[default]
    InProgress,

    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    Completed,

    #[db_rename = "failed"]
    #[serde(rename = "failed")]
    Failed,
}

impl RuntimeStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, RuntimeStatus::Completed | RuntimeStatus::Failed)
    }

    #[inline]
    pub fn is_ready(self) -> bool {
        matches!(self, RuntimeStatus::Completed)
    }
}
