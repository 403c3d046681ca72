//! Trigger model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::triggers;
use crate::types::{HasCreatedAt, HasUpdatedAt};

/// A declared trigger: `workflow × provider × trigger_type × input`, plus the
/// provider-scoped opaque `state` materialized once `create` succeeds.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = triggers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Trigger {
    pub id: Uuid,
    pub workflow_id: Uuid,
    pub provider_id: Uuid,
    pub trigger_type: String,
    pub input: serde_json::Value,
    /// Canonical-JSON encoding of `input`, used only to make
    /// `(workflow_id, provider_id, trigger_type, identity_key)` a unique key;
    /// never read back as meaningful data.
    pub identity_key: String,
    pub state: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Canonicalizes a JSON value for identity comparison: object keys sorted,
/// whitespace-free. `serde_json::Value`'s `Map` is already key-ordered
/// (BTreeMap-backed), so plain serialization is already canonical.
pub fn canonical_json(value: &serde_json::Value) -> String {
    serde_json::to_string(value).expect("Value serialization is infallible")
}

/// Data for creating a new trigger (the placeholder row inserted before
/// `adapter.create` runs; `state` is attached afterwards).
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = triggers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTrigger {
    pub workflow_id: Uuid,
    pub provider_id: Uuid,
    pub trigger_type: String,
    pub input: serde_json::Value,
    pub identity_key: String,
}

impl NewTrigger {
    pub fn new(workflow_id: Uuid, provider_id: Uuid, trigger_type: impl Into<String>, input: serde_json::Value) -> Self {
        let identity_key = canonical_json(&input);
        Self {
            workflow_id,
            provider_id,
            trigger_type: trigger_type.into(),
            input,
            identity_key,
        }
    }
}

/// Data for updating a trigger's materialized external state.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = triggers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateTriggerState {
    pub state: Option<Option<serde_json::Value>>,
}

impl HasCreatedAt for Trigger {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

impl HasUpdatedAt for Trigger {
    fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_json_is_order_independent_for_equal_maps() {
        let a = serde_json::json!({"b": 1, "a": 2});
        let b = serde_json::json!({"a": 2, "b": 1});
        assert_eq!(canonical_json(&a), canonical_json(&b));
    }
}
