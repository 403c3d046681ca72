//! Incoming webhooks table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Incoming webhooks table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum IncomingWebhookConstraints {
    #[strum(serialize = "incoming_webhooks_path_unique")]
    PathUnique,

    /// Exactly one of `trigger_id` / `provider_id` must be set.
    #[strum(serialize = "incoming_webhooks_exactly_one_owner")]
    ExactlyOneOwner,
}

impl IncomingWebhookConstraints {
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            IncomingWebhookConstraints::PathUnique => ConstraintCategory::Uniqueness,
            IncomingWebhookConstraints::ExactlyOneOwner => ConstraintCategory::BusinessLogic,
        }
    }
}

impl From<IncomingWebhookConstraints> for String {
    #[inline]
    fn from(val: IncomingWebhookConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for IncomingWebhookConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
