//! Provider model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::providers;
use crate::types::{HasCreatedAt, HasUpdatedAt, ProviderKind};

/// A configured integration with an external system, scoped to a namespace.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = providers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Provider {
    pub id: Uuid,
    pub namespace_id: Uuid,
    pub provider_type: ProviderKind,
    pub alias: String,
    /// XChaCha20-Poly1305-encrypted provider-specific credentials.
    pub encrypted_config: Vec<u8>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for creating a new provider.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = providers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProvider {
    pub namespace_id: Uuid,
    pub provider_type: ProviderKind,
    pub alias: String,
    pub encrypted_config: Vec<u8>,
}

impl NewProvider {
    /// Builds insert data for an auto-created, no-setup-steps provider
    /// (`builtin` / `kvstore`) with an empty encrypted config.
    pub fn auto_created(namespace_id: Uuid, provider_type: ProviderKind, alias: impl Into<String>) -> Self {
        debug_assert!(provider_type.has_no_setup_steps());
        Self {
            namespace_id,
            provider_type,
            alias: alias.into(),
            encrypted_config: Vec::new(),
        }
    }
}

/// Data for updating a provider's configuration.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = providers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateProvider {
    pub encrypted_config: Option<Vec<u8>>,
}

impl HasCreatedAt for Provider {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

impl HasUpdatedAt for Provider {
    fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}
