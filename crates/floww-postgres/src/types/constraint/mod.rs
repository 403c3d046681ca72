//! Database constraint violations organized by table.
//!
//! This module provides a comprehensive enumeration of the database constraint
//! violations a caller is expected to handle specially (unique-key conflicts,
//! mostly), organized into one sub-enum per table.

mod incoming_webhooks;
mod namespaces;
mod providers;
mod runtimes;
mod secrets;
mod triggers;
mod users;
mod workflows;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::incoming_webhooks::IncomingWebhookConstraints;
pub use self::namespaces::NamespaceConstraints;
pub use self::providers::ProviderConstraints;
pub use self::runtimes::RuntimeConstraints;
pub use self::secrets::SecretConstraints;
pub use self::triggers::TriggerConstraints;
pub use self::users::UserConstraints;
pub use self::workflows::WorkflowConstraints;

/// Unified constraint violation enum covering every table with a constraint
/// callers are expected to recognize and handle (mostly uniqueness).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    Namespace(NamespaceConstraints),
    User(UserConstraints),
    Provider(ProviderConstraints),
    Workflow(WorkflowConstraints),
    Trigger(TriggerConstraints),
    IncomingWebhook(IncomingWebhookConstraints),
    Runtime(RuntimeConstraints),
    Secret(SecretConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Business logic constraints (domain-specific rules, e.g. "exactly one owner").
    BusinessLogic,
}

impl ConstraintViolation {
    /// Attempts to parse a Postgres constraint name into a known violation.
    pub fn new(constraint: &str) -> Option<Self> {
        let prefix = constraint.split('_').next()?;
        macro_rules! try_parse {
            ($($parser:expr => $variant:ident),+ $(,)?) => {
                None$(.or_else(|| $parser(constraint).map(Self::$variant)))+
            };
        }

        match prefix {
            "namespaces" => try_parse!(NamespaceConstraints::new => Namespace),
            "users" => try_parse!(UserConstraints::new => User),
            "providers" => try_parse!(ProviderConstraints::new => Provider),
            "workflows" => try_parse!(WorkflowConstraints::new => Workflow),
            "triggers" => try_parse!(TriggerConstraints::new => Trigger),
            "incoming" => try_parse!(IncomingWebhookConstraints::new => IncomingWebhook),
            "runtimes" => try_parse!(RuntimeConstraints::new => Runtime),
            "secrets" => try_parse!(SecretConstraints::new => Secret),
            _ => None,
        }
    }

    /// Returns the table name associated with this constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Namespace(_) => "namespaces",
            Self::User(_) => "users",
            Self::Provider(_) => "providers",
            Self::Workflow(_) => "workflows",
            Self::Trigger(_) => "triggers",
            Self::IncomingWebhook(_) => "incoming_webhooks",
            Self::Runtime(_) => "runtimes",
            Self::Secret(_) => "secrets",
        }
    }

    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            Self::Namespace(c) => c.categorize(),
            Self::User(c) => c.categorize(),
            Self::Provider(c) => c.categorize(),
            Self::Workflow(c) => c.categorize(),
            Self::Trigger(c) => c.categorize(),
            Self::IncomingWebhook(c) => c.categorize(),
            Self::Runtime(c) => c.categorize(),
            Self::Secret(c) => c.categorize(),
        }
    }

    #[inline]
    pub fn constraint_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Namespace(c) => write!(f, "{}", c),
            Self::User(c) => write!(f, "{}", c),
            Self::Provider(c) => write!(f, "{}", c),
            Self::Workflow(c) => write!(f, "{}", c),
            Self::Trigger(c) => write!(f, "{}", c),
            Self::IncomingWebhook(c) => write!(f, "{}", c),
            Self::Runtime(c) => write!(f, "{}", c),
            Self::Secret(c) => write!(f, "{}", c),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| format!("unknown constraint: {}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_constraint() {
        assert_eq!(
            ConstraintViolation::new("providers_namespace_type_alias_unique"),
            Some(ConstraintViolation::Provider(
                ProviderConstraints::NamespaceTypeAliasUnique
            ))
        );
    }

    #[test]
    fn rejects_unknown_constraint() {
        assert_eq!(ConstraintViolation::new("unrelated_constraint"), None);
    }

    #[test]
    fn table_name_matches_variant() {
        let violation = ConstraintViolation::Trigger(TriggerConstraints::IdentityUnique);
        assert_eq!(violation.table_name(), "triggers");
    }
}
