//! Workflows table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Workflows table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum WorkflowConstraints {
    /// `(namespace_id, name)` must be unique.
    #[strum(serialize = "workflows_namespace_name_unique")]
    NamespaceNameUnique,
}

impl WorkflowConstraints {
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            WorkflowConstraints::NamespaceNameUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<WorkflowConstraints> for String {
    #[inline]
    fn from(val: WorkflowConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for WorkflowConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
