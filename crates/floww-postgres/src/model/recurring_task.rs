//! Recurring task model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::recurring_tasks;
use crate::types::HasCreatedAt;

/// Marks a [`Trigger`](super::Trigger) as schedule-backed: one row per
/// scheduled trigger, read by the scheduler on startup to rebuild its job
/// set from the durable store rather than from in-memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = recurring_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecurringTask {
    pub id: Uuid,
    pub trigger_id: Uuid,
    pub created_at: Timestamp,
}

/// Data for registering a new recurring task.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = recurring_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRecurringTask {
    pub trigger_id: Uuid,
}

impl HasCreatedAt for RecurringTask {
    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }
}
