//! Provider type enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The external system a [`Provider`](crate::model::Provider) integrates with.
///
/// `Builtin` and `Kvstore` have no setup steps and may be auto-created with
/// empty config; every other variant must be created explicitly before a
/// trigger can reference it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ProviderKind"]
pub enum ProviderKind {
    #[db_rename = "gitlab"]
    #[serde(rename = "gitlab")]
    Gitlab,

    #[db_rename = "slack"]
    #[serde(rename = "slack")]
    Slack,

    #[db_rename = "discord"]
    #[serde(rename = "discord")]
    Discord,

    #[db_rename = "github"]
    #[serde(rename = "github")]
    Github,

    #[db_rename = "jira"]
    #[serde(rename = "jira")]
    Jira,

    #[db_rename = "google_calendar"]
    #[serde(rename = "google_calendar")]
    GoogleCalendar,

    #[db_rename = "builtin"]
    #[serde(rename = "builtin")]
    Builtin,

    #[db_rename = "kvstore"]
    #[serde(rename = "kvstore")]
    Kvstore,
}

impl ProviderKind {
    /// Returns whether this provider type has no setup steps and may be
    /// auto-created with empty config.
    #[inline]
    pub fn has_no_setup_steps(self) -> bool {
        matches!(self, ProviderKind::Builtin | ProviderKind::Kvstore)
    }

    /// Returns whether this provider type delivers events via webhook
    /// (as opposed to polling, like `google_calendar`).
    #[inline]
    pub fn is_webhook_driven(self) -> bool {
        !matches!(self, ProviderKind::GoogleCalendar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_and_kvstore_have_no_setup_steps() {
        assert!(ProviderKind::Builtin.has_no_setup_steps());
        assert!(ProviderKind::Kvstore.has_no_setup_steps());
        assert!(!ProviderKind::Gitlab.has_no_setup_steps());
    }
}
