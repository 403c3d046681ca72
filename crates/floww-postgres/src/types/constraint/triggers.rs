//! Triggers table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Triggers table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum TriggerConstraints {
    /// `(workflow_id, provider_id, trigger_type, identity_key)` must be unique;
    /// this is the reconcile-equality identity the lifecycle manager diffs on.
    #[strum(serialize = "triggers_identity_unique")]
    IdentityUnique,
}

impl TriggerConstraints {
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            TriggerConstraints::IdentityUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<TriggerConstraints> for String {
    #[inline]
    fn from(val: TriggerConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for TriggerConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
