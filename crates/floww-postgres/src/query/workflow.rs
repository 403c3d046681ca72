//! Workflow repository for managing workflow definitions.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{NewWorkflow, UpdateWorkflow, Workflow};
use crate::types::{OffsetPage, OffsetPagination};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for workflow database operations.
pub trait WorkflowRepository {
    /// Creates a new workflow.
    fn create_workflow(&mut self, new_workflow: NewWorkflow) -> impl Future<Output = PgResult<Workflow>> + Send;

    /// Finds a workflow by ID.
    fn find_workflow_by_id(&mut self, workflow_id: Uuid) -> impl Future<Output = PgResult<Option<Workflow>>> + Send;

    /// Lists workflows in a namespace.
    fn list_workflows(
        &mut self,
        namespace_id: Uuid,
        pagination: OffsetPagination,
    ) -> impl Future<Output = PgResult<OffsetPage<Workflow>>> + Send;

    /// Updates a workflow.
    fn update_workflow(&mut self, workflow_id: Uuid, changes: UpdateWorkflow) -> impl Future<Output = PgResult<Workflow>> + Send;

    /// Soft deletes a workflow.
    fn delete_workflow(&mut self, workflow_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl WorkflowRepository for PgConnection {
    async fn create_workflow(&mut self, new_workflow: NewWorkflow) -> PgResult<Workflow> {
        use schema::workflows;

        let workflow = diesel::insert_into(workflows::table)
            .values(&new_workflow)
            .returning(Workflow::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(workflow)
    }

    async fn find_workflow_by_id(&mut self, workflow_id: Uuid) -> PgResult<Option<Workflow>> {
        use schema::workflows::dsl::*;

        let workflow = workflows
            .filter(id.eq(workflow_id))
            .filter(deleted_at.is_null())
            .select(Workflow::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(workflow)
    }

    async fn list_workflows(&mut self, filter_namespace_id: Uuid, pagination: OffsetPagination) -> PgResult<OffsetPage<Workflow>> {
        use schema::workflows::dsl::*;

        let items = workflows
            .filter(namespace_id.eq(filter_namespace_id))
            .filter(deleted_at.is_null())
            .select(Workflow::as_select())
            .order(created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)?;

        let total = if pagination.include_count {
            let count = workflows
                .filter(namespace_id.eq(filter_namespace_id))
                .filter(deleted_at.is_null())
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

    async fn update_workflow(&mut self, workflow_id: Uuid, changes: UpdateWorkflow) -> PgResult<Workflow> {
        use schema::workflows::dsl::*;

        let workflow = diesel::update(workflows)
            .filter(id.eq(workflow_id))
            .set(&changes)
            .returning(Workflow::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(workflow)
    }

    async fn delete_workflow(&mut self, workflow_id: Uuid) -> PgResult<()> {
        use schema::workflows::dsl::*;

        diesel::update(workflows)
            .filter(id.eq(workflow_id))
            .set(deleted_at.eq(Some(jiff_diesel::Timestamp::from(Timestamp::now()))))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
