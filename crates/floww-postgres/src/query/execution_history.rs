//! Execution history repository for recording and advancing execution attempts.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{ExecutionHistory, MarkExecutionFinished, MarkExecutionStarted, NewExecutionHistory};
use crate::types::{OffsetPage, OffsetPagination};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for execution history database operations.
pub trait ExecutionHistoryRepository {
    /// Records a newly received trigger fire.
    fn create_execution(&mut self, new_execution: NewExecutionHistory) -> impl Future<Output = PgResult<ExecutionHistory>> + Send;

    /// Finds an execution by ID.
    fn find_execution_by_id(&mut self, execution_id: Uuid) -> impl Future<Output = PgResult<Option<ExecutionHistory>>> + Send;

    /// Lists executions for a workflow, most recent first.
    fn list_executions_by_workflow(
        &mut self,
        workflow_id: Uuid,
        pagination: OffsetPagination,
    ) -> impl Future<Output = PgResult<OffsetPage<ExecutionHistory>>> + Send;

    /// Lists executions produced by a trigger, most recent first.
    fn list_executions_by_trigger(
        &mut self,
        trigger_id: Uuid,
        pagination: OffsetPagination,
    ) -> impl Future<Output = PgResult<OffsetPage<ExecutionHistory>>> + Send;

    /// Transitions an execution to `Started`.
    fn mark_execution_started(
        &mut self,
        execution_id: Uuid,
        changes: MarkExecutionStarted,
    ) -> impl Future<Output = PgResult<ExecutionHistory>> + Send;

    /// Transitions an execution to a terminal status
    /// (`Completed`, `Failed`, or `Timeout`).
    fn mark_execution_finished(
        &mut self,
        execution_id: Uuid,
        changes: MarkExecutionFinished,
    ) -> impl Future<Output = PgResult<ExecutionHistory>> + Send;
}

impl ExecutionHistoryRepository for PgConnection {
    async fn create_execution(&mut self, new_execution: NewExecutionHistory) -> PgResult<ExecutionHistory> {
        use schema::execution_history;

        let execution = diesel::insert_into(execution_history::table)
            .values(&new_execution)
            .returning(ExecutionHistory::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(execution)
    }

    async fn find_execution_by_id(&mut self, execution_id: Uuid) -> PgResult<Option<ExecutionHistory>> {
        use schema::execution_history::dsl::*;

        let execution = execution_history
            .filter(id.eq(execution_id))
            .select(ExecutionHistory::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(execution)
    }

    async fn list_executions_by_workflow(
        &mut self,
        filter_workflow_id: Uuid,
        pagination: OffsetPagination,
    ) -> PgResult<OffsetPage<ExecutionHistory>> {
        use schema::execution_history::dsl::*;

        let items = execution_history
            .filter(workflow_id.eq(filter_workflow_id))
            .select(ExecutionHistory::as_select())
            .order(received_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)?;

        let total = if pagination.include_count {
            let count = execution_history
                .filter(workflow_id.eq(filter_workflow_id))
                .count()
                .get_result::<i64>(self)
                .await
                .map_err(PgError::from)?;
            Some(count)
        } else {
            None
        };

        Ok(OffsetPage::new(items, total))
    }

    async fn list_executions_by_trigger(
        &mut self,
        filter_trigger_id: Uuid,
        pagination: OffsetPagination,
    ) -> PgResult<OffsetPage<ExecutionHistory>> {
        use schema::execution_history::dsl::*;

        let items = execution_history
            .filter(trigger_id.eq(filter_trigger_id))
            .select(ExecutionHistory::as_select())
            .order(received_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)?;

        let total = if pagination.include_count {
            let count = execution_history
                .filter(trigger_id.eq(filter_trigger_id))
                .count()
                .get_result::<i64>(self)
                .await
                .map_err(PgError::from)?;
            Some(count)
        } else {
            None
        };

        Ok(OffsetPage::new(items, total))
    }

    async fn mark_execution_started(&mut self, execution_id: Uuid, changes: MarkExecutionStarted) -> PgResult<ExecutionHistory> {
        use schema::execution_history::dsl::*;

        let execution = diesel::update(execution_history)
            .filter(id.eq(execution_id))
            .set(&changes)
            .returning(ExecutionHistory::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(execution)
    }

    async fn mark_execution_finished(&mut self, execution_id: Uuid, changes: MarkExecutionFinished) -> PgResult<ExecutionHistory> {
        use schema::execution_history::dsl::*;

        let execution = diesel::update(execution_history)
            .filter(id.eq(execution_id))
            .set(&changes)
            .returning(ExecutionHistory::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(execution)
    }
}
