//! One submodule per [`floww_postgres::types::ProviderKind`], each
//! implementing [`crate::adapter::Adapter`].

pub mod builtin;
pub mod discord;
pub mod github;
pub mod gitlab;
pub mod google_calendar;
pub mod jira;
pub mod kvstore;
pub mod slack;

use serde_json::Value;

/// Returns whether a trigger's filter at `key` matches `actual`.
///
/// A filter is "no filter" (always matches) if the key is absent from
/// `input` or its value is `null`. Otherwise the filter value must equal
/// `actual` exactly. This is the shared semantics behind every provider's
/// per-field matching rules in the adapter table.
pub(crate) fn filter_matches(input: &Value, key: &str, actual: &Value) -> bool {
    match input.get(key) {
        None | Some(Value::Null) => true,
        Some(expected) => expected == actual,
    }
}

/// Returns whether a boolean flag in `input` is set, defaulting to `false`.
pub(crate) fn flag_enabled(input: &Value, key: &str) -> bool {
    input.get(key).and_then(Value::as_bool).unwrap_or(false)
}
