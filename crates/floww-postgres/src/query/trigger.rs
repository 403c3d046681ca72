//! Trigger repository for managing declared triggers.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewTrigger, Trigger, UpdateTriggerState};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for trigger database operations.
pub trait TriggerRepository {
    /// Creates a new trigger.
    fn create_trigger(&mut self, new_trigger: NewTrigger) -> impl Future<Output = PgResult<Trigger>> + Send;

    /// Finds a trigger by ID.
    fn find_trigger_by_id(&mut self, trigger_id: Uuid) -> impl Future<Output = PgResult<Option<Trigger>>> + Send;

    /// Finds a trigger by its logical identity:
    /// `(workflow_id, provider_id, trigger_type, identity_key)`.
    fn find_trigger_by_identity(
        &mut self,
        workflow_id: Uuid,
        provider_id: Uuid,
        trigger_type: &str,
        identity_key: &str,
    ) -> impl Future<Output = PgResult<Option<Trigger>>> + Send;

    /// Lists all triggers declared by a workflow.
    fn list_triggers_by_workflow(&mut self, workflow_id: Uuid) -> impl Future<Output = PgResult<Vec<Trigger>>> + Send;

    /// Lists all triggers routed through a provider.
    fn list_triggers_by_provider(&mut self, provider_id: Uuid) -> impl Future<Output = PgResult<Vec<Trigger>>> + Send;

    /// Updates a trigger's materialized external state.
    fn update_trigger_state(&mut self, trigger_id: Uuid, changes: UpdateTriggerState) -> impl Future<Output = PgResult<Trigger>> + Send;

    /// Deletes a trigger.
    fn delete_trigger(&mut self, trigger_id: Uuid) -> impl Future<Output = PgResult<()>> + Send;
}

impl TriggerRepository for PgConnection {
    async fn create_trigger(&mut self, new_trigger: NewTrigger) -> PgResult<Trigger> {
        use schema::triggers;

        let trigger = diesel::insert_into(triggers::table)
            .values(&new_trigger)
            .returning(Trigger::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(trigger)
    }

    async fn find_trigger_by_id(&mut self, trigger_id: Uuid) -> PgResult<Option<Trigger>> {
        use schema::triggers::dsl::*;

        let trigger = triggers
            .filter(id.eq(trigger_id))
            .select(Trigger::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(trigger)
    }

    async fn find_trigger_by_identity(
        &mut self,
        filter_workflow_id: Uuid,
        filter_provider_id: Uuid,
        filter_trigger_type: &str,
        filter_identity_key: &str,
    ) -> PgResult<Option<Trigger>> {
        use schema::triggers::dsl::*;

        let trigger = triggers
            .filter(workflow_id.eq(filter_workflow_id))
            .filter(provider_id.eq(filter_provider_id))
            .filter(trigger_type.eq(filter_trigger_type))
            .filter(identity_key.eq(filter_identity_key))
            .select(Trigger::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(trigger)
    }

    async fn list_triggers_by_workflow(&mut self, filter_workflow_id: Uuid) -> PgResult<Vec<Trigger>> {
        use schema::triggers::dsl::*;

        let rows = triggers
            .filter(workflow_id.eq(filter_workflow_id))
            .select(Trigger::as_select())
            .order(created_at.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn list_triggers_by_provider(&mut self, filter_provider_id: Uuid) -> PgResult<Vec<Trigger>> {
        use schema::triggers::dsl::*;

        let rows = triggers
            .filter(provider_id.eq(filter_provider_id))
            .select(Trigger::as_select())
            .order(created_at.asc())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn update_trigger_state(&mut self, trigger_id: Uuid, changes: UpdateTriggerState) -> PgResult<Trigger> {
        use schema::triggers::dsl::*;

        let trigger = diesel::update(triggers)
            .filter(id.eq(trigger_id))
            .set(&changes)
            .returning(Trigger::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(trigger)
    }

    async fn delete_trigger(&mut self, trigger_id: Uuid) -> PgResult<()> {
        use schema::triggers::dsl::*;

        diesel::delete(triggers)
            .filter(id.eq(trigger_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }
}
