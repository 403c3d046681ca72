//! Incoming webhook model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::incoming_webhooks;
use crate::types::HasCreatedAt;

/// A registered inbound HTTP path. Exactly one of `trigger_id` or
/// `provider_id` is set: the former routes directly to a single trigger, the
/// latter hands the raw request to a provider adapter for dispatch (e.g. a
/// GitHub webhook fanning out to many triggers by event type).
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = incoming_webhooks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IncomingWebhook {
    pub id: Uuid,
    pub path: String,
    pub method: String,
    pub trigger_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
    pub created_at: Timestamp,
}

/// Data for registering a new incoming webhook.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = incoming_webhooks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewIncomingWebhook {
    pub path: String,
    pub method: String,
    pub trigger_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
}

impl NewIncomingWebhook {
    pub fn for_trigger(path: impl Into<String>, method: impl Into<String>, trigger_id: Uuid) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            trigger_id: Some(trigger_id),
            provider_id: None,
        }
    }

    pub fn for_provider(path: impl Into<String>, method: impl Into<String>, provider_id: Uuid) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            trigger_id: None,
            provider_id: Some(provider_id),
        }
    }
}

impl HasCreatedAt for IncomingWebhook {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_trigger_sets_exactly_one_column() {
        let id = Uuid::now_v7();
        let webhook = NewIncomingWebhook::for_trigger("/hooks/abc", "POST", id);
        assert_eq!(webhook.trigger_id, Some(id));
        assert_eq!(webhook.provider_id, None);
    }

    #[test]
    fn for_provider_sets_exactly_one_column() {
        let id = Uuid::now_v7();
        let webhook = NewIncomingWebhook::for_provider("/hooks/gh", "POST", id);
        assert_eq!(webhook.provider_id, Some(id));
        assert_eq!(webhook.trigger_id, None);
    }
}
