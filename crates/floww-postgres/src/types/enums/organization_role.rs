//! Organization membership role enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Role of a user within an organization.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::OrganizationRole"]
pub enum OrganizationRole {
    /// Full administrative control, including membership and billing.
    #[db_rename = "owner"]
    #[serde(rename = "owner")]
    Owner,

    /// Can manage namespaces, providers, and workflows but not membership.
    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    #[default]
    Admin,

    /// Read/write access to namespaces the organization owns.
    #[db_rename = "member"]
    #[serde(rename = "member")]
    Member,
}

impl OrganizationRole {
    /// Returns whether this role can manage organization membership.
    #[inline]
    pub fn can_manage_members(self) -> bool {
        matches!(self, OrganizationRole::Owner)
    }

    /// Returns whether this role can edit namespaces, providers, and workflows.
    #[inline]
    pub fn can_edit(self) -> bool {
        matches!(self, OrganizationRole::Owner | OrganizationRole::Admin)
    }
}
