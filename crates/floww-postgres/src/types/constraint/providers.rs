//! Providers table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Providers table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ProviderConstraints {
    /// `(namespace_id, provider_type, alias)` must be unique.
    #[strum(serialize = "providers_namespace_type_alias_unique")]
    NamespaceTypeAliasUnique,
}

impl ProviderConstraints {
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ProviderConstraints::NamespaceTypeAliasUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<ProviderConstraints> for String {
    #[inline]
    fn from(val: ProviderConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ProviderConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
