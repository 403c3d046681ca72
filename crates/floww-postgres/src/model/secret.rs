//! Secret model for PostgreSQL database operations.
//!
//! Stores a namespace-scoped encrypted key/value blob, using the same
//! XChaCha20-Poly1305 wire format as [`Provider::encrypted_config`](super::Provider::encrypted_config).

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::secrets;
use crate::types::{HasCreatedAt, HasUpdatedAt};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = secrets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Secret {
    pub id: Uuid,
    pub namespace_id: Uuid,
    pub key: String,
    pub encrypted_value: Vec<u8>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for creating a new secret.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = secrets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSecret {
    pub namespace_id: Uuid,
    pub key: String,
    pub encrypted_value: Vec<u8>,
}

/// Data for updating a secret's value.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = secrets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateSecret {
    pub encrypted_value: Option<Vec<u8>>,
}

impl HasCreatedAt for Secret {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

impl HasUpdatedAt for Secret {
    fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}
