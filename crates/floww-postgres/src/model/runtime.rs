//! Runtime model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::schema::runtimes;
use crate::types::{HasCreatedAt, HasUpdatedAt, RuntimeStatus};

/// A content-addressed execution unit: two requests with identical `config`
/// resolve to the same row via [`config_hash`](Self::config_hash).
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = runtimes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Runtime {
    pub id: Uuid,
    pub config: serde_json::Value,
    pub config_hash: String,
    pub status: RuntimeStatus,
    /// Ordered creation-log entries, each `{timestamp, level, message}`.
    pub logs: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Computes the deterministic content-address for a runtime config.
///
/// Config keys are serialized in the order `serde_json::Value` yields them
/// (a `BTreeMap`-backed `Map`, so insertion order does not matter); two
/// semantically identical configs always hash identically.
pub fn config_hash(config: &serde_json::Value) -> String {
    let canonical = serde_json::to_vec(config).expect("Value serialization is infallible");
    let digest = Sha256::digest(&canonical);
    hex::encode(digest)
}

/// Data for creating a new runtime.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = runtimes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRuntime {
    pub config: serde_json::Value,
    pub config_hash: String,
    pub status: RuntimeStatus,
    pub logs: serde_json::Value,
}

impl NewRuntime {
    /// Builds insert data for a freshly requested runtime, hashing `config`.
    pub fn requested(config: serde_json::Value) -> Self {
        let hash = config_hash(&config);
        Self {
            config,
            config_hash: hash,
            status: RuntimeStatus::InProgress,
            logs: serde_json::Value::Array(Vec::new()),
        }
    }
}

/// Data for updating a runtime's status and log.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = runtimes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateRuntime {
    pub status: Option<RuntimeStatus>,
    pub logs: Option<serde_json::Value>,
}

impl HasCreatedAt for Runtime {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

impl HasUpdatedAt for Runtime {
    fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_configs_hash_identically() {
        let a = serde_json::json!({"image": "floww/worker:1", "cpu": 1});
        let b = serde_json::json!({"image": "floww/worker:1", "cpu": 1});
        assert_eq!(config_hash(&a), config_hash(&b));
    }

    #[test]
    fn different_configs_hash_differently() {
        let a = serde_json::json!({"image": "floww/worker:1"});
        let b = serde_json::json!({"image": "floww/worker:2"});
        assert_ne!(config_hash(&a), config_hash(&b));
    }
}
