//! Workflow deployment repository for managing deployed workflow snapshots.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewWorkflowDeployment, UpdateWorkflowDeploymentStatus, WorkflowDeployment};
use crate::types::DeploymentStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for workflow deployment database operations.
pub trait WorkflowDeploymentRepository {
    /// Creates a new deployment.
    fn create_workflow_deployment(
        &mut self,
        new_deployment: NewWorkflowDeployment,
    ) -> impl Future<Output = PgResult<WorkflowDeployment>> + Send;

    /// Finds a deployment by ID.
    fn find_workflow_deployment_by_id(
        &mut self,
        deployment_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<WorkflowDeployment>>> + Send;

    /// Finds the active deployment for a workflow, if any.
    fn find_active_deployment(&mut self, workflow_id: Uuid) -> impl Future<Output = PgResult<Option<WorkflowDeployment>>> + Send;

    /// Lists all deployments for a workflow, most recent first.
    fn list_workflow_deployments(&mut self, workflow_id: Uuid) -> impl Future<Output = PgResult<Vec<WorkflowDeployment>>> + Send;

    /// Deactivates the currently active deployment for a workflow, if any,
    /// and returns the deployment that was deactivated.
    fn deactivate_active_deployment(
        &mut self,
        workflow_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<WorkflowDeployment>>> + Send;

    /// Sets a deployment's status.
    fn update_workflow_deployment_status(
        &mut self,
        deployment_id: Uuid,
        changes: UpdateWorkflowDeploymentStatus,
    ) -> impl Future<Output = PgResult<WorkflowDeployment>> + Send;
}

impl WorkflowDeploymentRepository for PgConnection {
    async fn create_workflow_deployment(&mut self, new_deployment: NewWorkflowDeployment) -> PgResult<WorkflowDeployment> {
        use schema::workflow_deployments;

        let deployment = diesel::insert_into(workflow_deployments::table)
            .values(&new_deployment)
            .returning(WorkflowDeployment::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(deployment)
    }

    async fn find_workflow_deployment_by_id(&mut self, deployment_id: Uuid) -> PgResult<Option<WorkflowDeployment>> {
        use schema::workflow_deployments::dsl::*;

        let deployment = workflow_deployments
            .filter(id.eq(deployment_id))
            .select(WorkflowDeployment::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(deployment)
    }

    async fn find_active_deployment(&mut self, filter_workflow_id: Uuid) -> PgResult<Option<WorkflowDeployment>> {
        use schema::workflow_deployments::dsl::*;

        let deployment = workflow_deployments
            .filter(workflow_id.eq(filter_workflow_id))
            .filter(status.eq(DeploymentStatus::Active))
            .select(WorkflowDeployment::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(deployment)
    }

    async fn list_workflow_deployments(&mut self, filter_workflow_id: Uuid) -> PgResult<Vec<WorkflowDeployment>> {
        use schema::workflow_deployments::dsl::*;

        let rows = workflow_deployments
            .filter(workflow_id.eq(filter_workflow_id))
            .select(WorkflowDeployment::as_select())
            .order(created_at.desc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn deactivate_active_deployment(&mut self, filter_workflow_id: Uuid) -> PgResult<Option<WorkflowDeployment>> {
        use schema::workflow_deployments::dsl::*;

        let deployment = diesel::update(workflow_deployments)
            .filter(workflow_id.eq(filter_workflow_id))
            .filter(status.eq(DeploymentStatus::Active))
            .set(status.eq(DeploymentStatus::Inactive))
            .returning(WorkflowDeployment::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(deployment)
    }

    async fn update_workflow_deployment_status(
        &mut self,
        deployment_id: Uuid,
        changes: UpdateWorkflowDeploymentStatus,
    ) -> PgResult<WorkflowDeployment> {
        use schema::workflow_deployments::dsl::*;

        let deployment = diesel::update(workflow_deployments)
            .filter(id.eq(deployment_id))
            .set(&changes)
            .returning(WorkflowDeployment::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(deployment)
    }
}
