//! Secrets table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Secrets table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum SecretConstraints {
    #[strum(serialize = "secrets_namespace_key_unique")]
    NamespaceKeyUnique,
}

impl SecretConstraints {
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            SecretConstraints::NamespaceKeyUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<SecretConstraints> for String {
    #[inline]
    fn from(val: SecretConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for SecretConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
