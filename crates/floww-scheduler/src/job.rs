//! Job schedule and descriptor types.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix shared by every recurring-task job ID, so orphan jobs (no
/// matching `RecurringTask` row) can be recognized during
/// [`crate::JobStore::sync_all_recurring_tasks`].
pub const RECURRING_TASK_JOB_PREFIX: &str = "recurring_task_";

/// Builds the scheduler job ID for a recurring task's trigger.
pub fn recurring_task_job_id(trigger_id: Uuid) -> String {
    format!("{RECURRING_TASK_JOB_PREFIX}{trigger_id}")
}

/// A job's firing cadence: either a UTC cron expression or a fixed interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobSchedule {
    /// Standard five/six-field cron expression, evaluated in UTC.
    Cron(String),
    /// Fixed interval between firings, in seconds.
    IntervalSeconds(u64),
}

impl JobSchedule {
    /// Returns the interval as a [`Duration`], if this is an interval schedule.
    pub fn interval(&self) -> Option<Duration> {
        match self {
            JobSchedule::IntervalSeconds(secs) => Some(Duration::from_secs(*secs)),
            JobSchedule::Cron(_) => None,
        }
    }
}

/// A boxed, cloneable async callback invoked on each tick.
pub type JobCallback = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Resolves a trigger's current schedule and tick callback during
/// [`crate::JobStore::sync_all_recurring_tasks`].
///
/// Only the caller (the provider layer) knows how to read a schedule back
/// out of a trigger's `input`, so the store defers both schedule lookup and
/// callback construction to this resolver rather than assuming a shape for
/// `input` itself. Returning `None` means the trigger is no longer
/// schedule-backed and any existing job for it should be removed.
pub type JobResolver = Arc<dyn Fn(Uuid) -> Pin<Box<dyn Future<Output = Option<(JobSchedule, JobCallback)>> + Send>> + Send + Sync>;

/// Read-only view of a registered job, returned by `list_jobs`/`get_job`.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    /// The job's ID, e.g. `recurring_task_<uuid>`.
    pub job_id: String,
    /// The job's firing cadence.
    pub schedule: JobSchedule,
    /// When this job last fired, if ever.
    pub last_fired_at: Option<Timestamp>,
    /// When this job is next scheduled to fire.
    pub next_fire_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurring_task_job_id_carries_the_prefix() {
        let trigger_id = Uuid::max();
        let job_id = recurring_task_job_id(trigger_id);
        assert!(job_id.starts_with(RECURRING_TASK_JOB_PREFIX));
        assert!(job_id.ends_with(&trigger_id.to_string()));
    }

    #[test]
    fn interval_schedule_reports_its_duration() {
        let schedule = JobSchedule::IntervalSeconds(90);
        assert_eq!(schedule.interval(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn cron_schedule_has_no_fixed_interval() {
        let schedule = JobSchedule::Cron("0 * * * * *".to_string());
        assert_eq!(schedule.interval(), None);
    }
}
