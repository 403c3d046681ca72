//! Runtime repository for managing content-addressed execution units.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewRuntime, Runtime, UpdateRuntime};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for runtime database operations.
pub trait RuntimeRepository {
    /// Finds an existing runtime by content hash, or inserts a new one.
    ///
    /// Concurrent callers racing to create the same config resolve to the
    /// same row via the `config_hash` unique constraint: the loser's insert
    /// conflicts and falls back to a lookup.
    fn find_or_create_runtime(&mut self, new_runtime: NewRuntime) -> impl Future<Output = PgResult<Runtime>> + Send;

    /// Finds a runtime by ID.
    fn find_runtime_by_id(&mut self, runtime_id: Uuid) -> impl Future<Output = PgResult<Option<Runtime>>> + Send;

    /// Finds a runtime by its content hash.
    fn find_runtime_by_hash(&mut self, hash: &str) -> impl Future<Output = PgResult<Option<Runtime>>> + Send;

    /// Updates a runtime's status and logs.
    fn update_runtime(&mut self, runtime_id: Uuid, changes: UpdateRuntime) -> impl Future<Output = PgResult<Runtime>> + Send;
}

impl RuntimeRepository for PgConnection {
    async fn find_or_create_runtime(&mut self, new_runtime: NewRuntime) -> PgResult<Runtime> {
        use schema::runtimes;
        use schema::runtimes::dsl::*;

        let inserted = diesel::insert_into(runtimes::table)
            .values(&new_runtime)
            .on_conflict(config_hash)
            .do_nothing()
            .returning(Runtime::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        if let Some(runtime) = inserted {
            return Ok(runtime);
        }

        let runtime = runtimes
            .filter(config_hash.eq(&new_runtime.config_hash))
            .select(Runtime::as_select())
            .first(self)
            .await
            .map_err(PgError::from)?;

        Ok(runtime)
    }

    async fn find_runtime_by_id(&mut self, runtime_id: Uuid) -> PgResult<Option<Runtime>> {
        use schema::runtimes::dsl::*;

        let runtime = runtimes
            .filter(id.eq(runtime_id))
            .select(Runtime::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(runtime)
    }

    async fn find_runtime_by_hash(&mut self, hash: &str) -> PgResult<Option<Runtime>> {
        use schema::runtimes::dsl::*;

        let runtime = runtimes
            .filter(config_hash.eq(hash))
            .select(Runtime::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(runtime)
    }

    async fn update_runtime(&mut self, runtime_id: Uuid, changes: UpdateRuntime) -> PgResult<Runtime> {
        use schema::runtimes::dsl::*;

        let runtime = diesel::update(runtimes)
            .filter(id.eq(runtime_id))
            .set(&changes)
            .returning(Runtime::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(runtime)
    }
}
