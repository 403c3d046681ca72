//! Recurring task repository for the scheduler's durable job store.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewRecurringTask, RecurringTask};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for recurring task database operations.
pub trait RecurringTaskRepository {
    /// Registers a trigger as schedule-backed.
    fn create_recurring_task(&mut self, new_task: NewRecurringTask) -> impl Future<Output = PgResult<RecurringTask>> + Send;

    /// Lists every recurring task, read by the scheduler on startup to
    /// rebuild its in-memory job set.
    fn list_recurring_tasks(&mut self) -> impl Future<Output = PgResult<Vec<RecurringTask>>> + Send;

    /// Finds the recurring task for a given trigger, if any.
    fn find_recurring_task_by_trigger(&mut self, trigger_id: Uuid) -> impl Future<Output = PgResult<Option<RecurringTask>>> + Send;

    /// Removes a recurring task, e.g. when its trigger is deleted.
    fn delete_recurring_task(&mut self, trigger_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl RecurringTaskRepository for PgConnection {
    async fn create_recurring_task(&mut self, new_task: NewRecurringTask) -> PgResult<RecurringTask> {
        use schema::recurring_tasks;

        let task = diesel::insert_into(recurring_tasks::table)
            .values(&new_task)
            .returning(RecurringTask::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(task)
    }

    async fn list_recurring_tasks(&mut self) -> PgResult<Vec<RecurringTask>> {
        use schema::recurring_tasks::dsl::*;

        let rows = recurring_tasks
            .select(RecurringTask::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn find_recurring_task_by_trigger(&mut self, filter_trigger_id: Uuid) -> PgResult<Option<RecurringTask>> {
        use schema::recurring_tasks::dsl::*;

        let task = recurring_tasks
            .filter(trigger_id.eq(filter_trigger_id))
            .select(RecurringTask::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(task)
    }

    async fn delete_recurring_task(&mut self, filter_trigger_id: Uuid) -> PgResult<()> {
        use schema::recurring_tasks::dsl::*;

        diesel::delete(recurring_tasks)
            .filter(trigger_id.eq(filter_trigger_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
