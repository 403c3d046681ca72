//! Namespaces table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Namespaces table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum NamespaceConstraints {
    #[strum(serialize = "namespaces_name_unique")]
    NameUnique,

    /// Exactly one of `owner_user_id` / `owner_organization_id` must be set.
    #[strum(serialize = "namespaces_exactly_one_owner")]
    ExactlyOneOwner,
}

impl NamespaceConstraints {
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            NamespaceConstraints::NameUnique => ConstraintCategory::Uniqueness,
            NamespaceConstraints::ExactlyOneOwner => ConstraintCategory::BusinessLogic,
        }
    }
}

impl From<NamespaceConstraints> for String {
    #[inline]
    fn from(val: NamespaceConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for NamespaceConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
