//! The durable job store contract.

use crate::error::SchedulerResult;
use crate::job::{JobCallback, JobDescriptor, JobResolver, JobSchedule};

/// A durable, replica-shared store of scheduled jobs.
///
/// Implementations guarantee single-fire-across-replicas semantics: at most
/// one replica executes a given tick (`max_instances = 1`), missed ticks
/// combine into a single catch-up run (`coalesce = true`), and ticks more
/// than [`misfire_grace`](Self::misfire_grace) stale are dropped rather than
/// run late.
#[async_trait::async_trait]
pub trait JobStore: Send + Sync {
    /// Registers a job, replacing any existing job with the same ID.
    async fn add_job(&self, job_id: &str, schedule: JobSchedule, callback: JobCallback) -> SchedulerResult<()>;

    /// Removes a job. Idempotent: removing a job that does not exist is not an error.
    async fn remove_job(&self, job_id: &str) -> SchedulerResult<()>;

    /// Lists every currently registered job.
    async fn list_jobs(&self) -> SchedulerResult<Vec<JobDescriptor>>;

    /// Looks up a single job by ID.
    async fn get_job(&self, job_id: &str) -> SchedulerResult<Option<JobDescriptor>>;

    /// Changes a job's firing cadence without touching its callback.
    async fn reschedule_job(&self, job_id: &str, schedule: JobSchedule) -> SchedulerResult<()>;

    /// Idempotent reconcile: adds or updates a job for every durable
    /// `RecurringTask` row, and removes any in-process job whose ID carries
    /// [`crate::job::RECURRING_TASK_JOB_PREFIX`] but has no corresponding row.
    ///
    /// `resolve` rebuilds the schedule and tick callback for a trigger ID,
    /// since neither is itself durable — only the fact that the trigger is
    /// schedule-backed is.
    async fn sync_all_recurring_tasks(&self, resolve: JobResolver) -> SchedulerResult<()>;

    /// The misfire grace period: ticks scheduled more than this long ago
    /// when finally picked up are dropped rather than run.
    fn misfire_grace(&self) -> std::time::Duration {
        let secs = u64::try_from(floww_postgres::types::MISFIRE_GRACE_SECONDS).unwrap_or(30);
        std::time::Duration::from_secs(secs)
    }
}
