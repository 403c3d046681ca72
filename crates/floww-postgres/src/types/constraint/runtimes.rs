//! Runtimes table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Runtimes table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum RuntimeConstraints {
    /// `config_hash` must be unique; backs the content-addressed upsert.
    #[strum(serialize = "runtimes_config_hash_unique")]
    ConfigHashUnique,
}

impl RuntimeConstraints {
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            RuntimeConstraints::ConfigHashUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<RuntimeConstraints> for String {
    #[inline]
    fn from(val: RuntimeConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for RuntimeConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
