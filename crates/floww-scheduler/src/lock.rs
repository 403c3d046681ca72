//! Postgres advisory-lock helper providing single-fire-across-replicas semantics.
//!
//! Every replica runs its own in-process [`tokio_cron_scheduler::JobScheduler`]
//! ticking independently; without coordination, a cron tick due at the same
//! wall-clock instant would fire once per replica. Wrapping each tick in a
//! session-scoped `pg_try_advisory_lock` keyed by the job ID means only the
//! replica that wins the lock executes the callback — the rest observe the
//! lock as held and skip, which is the `max_instances = 1` contract from the
//! caller's point of view.

use std::future::Future;

use diesel::sql_types::{Bool, Text};
use diesel::QueryableByName;
use diesel_async::RunQueryDsl;

use crate::error::SchedulerResult;

#[derive(QueryableByName)]
struct LockRow {
    #[diesel(sql_type = Bool)]
    locked: bool,
}

/// Runs `callback` under a session-scoped advisory lock keyed by `job_id`.
/// If the lock cannot be acquired (another replica is mid-tick), the
/// callback is skipped and this returns `Ok(false)`.
///
/// The lock is taken and released on the same pooled connection, since
/// `pg_advisory_lock`/`pg_advisory_unlock` are session-scoped: releasing
/// from a different connection would be a no-op and leak the lock until
/// that connection closes.
pub async fn with_fire_lock<F, Fut>(client: &floww_postgres::PgClient, job_id: &str, callback: F) -> SchedulerResult<bool>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut conn = client.get_connection().await?;

    let acquired: LockRow = diesel::sql_query("SELECT pg_try_advisory_lock(hashtext($1)) AS locked")
        .bind::<Text, _>(job_id)
        .get_result(&mut conn)
        .await
        .map_err(floww_postgres::PgError::from)?;

    if !acquired.locked {
        return Ok(false);
    }

    callback().await;

    let _: LockRow = diesel::sql_query("SELECT pg_advisory_unlock(hashtext($1)) AS locked")
        .bind::<Text, _>(job_id)
        .get_result(&mut conn)
        .await
        .map_err(floww_postgres::PgError::from)?;

    Ok(true)
}
