//! Postgres-backed [`JobStore`] implementation.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use cron::Schedule as CronSchedule;
use jiff::Timestamp;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::job::{JobCallback, JobDescriptor, JobResolver, JobSchedule, RECURRING_TASK_JOB_PREFIX, recurring_task_job_id};
use crate::lock;
use crate::store::JobStore;
use crate::TRACING_TARGET;

struct JobEntry {
    scheduler_id: Uuid,
    schedule: JobSchedule,
    /// The caller-supplied, unwrapped callback, kept so `reschedule_job` can
    /// rebuild the job under a new schedule without the caller resupplying it.
    callback: JobCallback,
    last_fired_at: Arc<Mutex<Option<Timestamp>>>,
}

/// A [`JobStore`] backed by an in-process [`tokio_cron_scheduler::JobScheduler`]
/// and a Postgres database, used for two things: single-fire-across-replicas
/// coordination (an advisory lock taken around every tick) and, during
/// [`sync_all_recurring_tasks`](JobStore::sync_all_recurring_tasks), durable
/// discovery of which triggers are schedule-backed.
pub struct PgJobStore {
    client: floww_postgres::PgClient,
    scheduler: JobScheduler,
    jobs: Mutex<HashMap<String, JobEntry>>,
}

impl PgJobStore {
    /// Builds a store on top of a running [`tokio_cron_scheduler::JobScheduler`].
    ///
    /// The caller is responsible for calling `scheduler.start()` once, after
    /// construction, per the underlying crate's contract.
    pub fn new(client: floww_postgres::PgClient, scheduler: JobScheduler) -> Self {
        Self {
            client,
            scheduler,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    fn wrap_callback(&self, job_id: String, callback: JobCallback, last_fired_at: Arc<Mutex<Option<Timestamp>>>) -> JobCallback {
        let client = self.client.clone();
        Arc::new(move || {
            let client = client.clone();
            let job_id = job_id.clone();
            let callback = callback.clone();
            let last_fired_at = last_fired_at.clone();
            Box::pin(async move {
                let fired = lock::with_fire_lock(&client, &job_id, || {
                    let callback = callback.clone();
                    async move { callback().await }
                })
                .await;

                match fired {
                    Ok(true) => {
                        if let Ok(mut guard) = last_fired_at.lock() {
                            *guard = Timestamp::now().into();
                        }
                    }
                    Ok(false) => {
                        tracing::debug!(target: TRACING_TARGET, job_id, "Tick skipped, fire lock held by another replica");
                    }
                    Err(error) => {
                        tracing::warn!(target: TRACING_TARGET, job_id, %error, "Failed to coordinate fire lock, tick skipped");
                    }
                }
            })
        })
    }

    fn tokio_cron_job(schedule: &JobSchedule, job_id: String, ticked: JobCallback) -> SchedulerResult<Job> {
        match schedule {
            JobSchedule::Cron(expression) => {
                CronSchedule::from_str(expression).map_err(|error| SchedulerError::InvalidExpression {
                    expression: expression.clone(),
                    message: error.to_string(),
                })?;

                let job_id_for_log = job_id.clone();
                Job::new_async(expression.as_str(), move |_uuid, _scheduler| {
                    let ticked = ticked.clone();
                    let job_id = job_id_for_log.clone();
                    Box::pin(async move {
                        tracing::debug!(target: TRACING_TARGET, job_id, "Tick fired");
                        ticked().await;
                    })
                })
                .map_err(SchedulerError::from)
            }
            JobSchedule::IntervalSeconds(secs) => {
                let interval = std::time::Duration::from_secs(*secs);
                let job_id_for_log = job_id.clone();
                Job::new_repeated_async(interval, move |_uuid, _scheduler| {
                    let ticked = ticked.clone();
                    let job_id = job_id_for_log.clone();
                    Box::pin(async move {
                        tracing::debug!(target: TRACING_TARGET, job_id, "Tick fired");
                        ticked().await;
                    })
                })
                .map_err(SchedulerError::from)
            }
        }
    }

    async fn remove_internal(&self, job_id: &str) -> SchedulerResult<()> {
        let entry = {
            let mut jobs = self.jobs.lock().expect("job map poisoned");
            jobs.remove(job_id)
        };

        if let Some(entry) = entry {
            self.scheduler.remove(&entry.scheduler_id).await?;
        }

        Ok(())
    }

    fn next_fire_at(schedule: &JobSchedule, last_fired_at: Option<Timestamp>) -> Option<Timestamp> {
        match schedule {
            JobSchedule::Cron(expression) => {
                let parsed = CronSchedule::from_str(expression).ok()?;
                let next = parsed.upcoming(chrono::Utc).next()?;
                Timestamp::new(next.timestamp(), next.timestamp_subsec_nanos() as i32).ok()
            }
            JobSchedule::IntervalSeconds(secs) => {
                let base = last_fired_at.unwrap_or_else(Timestamp::now);
                base.checked_add(jiff::Span::new().seconds(*secs as i64)).ok()
            }
        }
    }
}

#[async_trait::async_trait]
impl JobStore for PgJobStore {
    async fn add_job(&self, job_id: &str, schedule: JobSchedule, callback: JobCallback) -> SchedulerResult<()> {
        self.remove_internal(job_id).await?;

        let last_fired_at = Arc::new(Mutex::new(None));
        let wrapped = self.wrap_callback(job_id.to_string(), callback.clone(), last_fired_at.clone());
        let job = Self::tokio_cron_job(&schedule, job_id.to_string(), wrapped)?;
        let scheduler_id = job.guid();

        self.scheduler.add(job).await?;

        let mut jobs = self.jobs.lock().expect("job map poisoned");
        jobs.insert(
            job_id.to_string(),
            JobEntry {
                scheduler_id,
                schedule,
                callback,
                last_fired_at,
            },
        );

        tracing::info!(target: TRACING_TARGET, job_id, "Job registered");
        Ok(())
    }

    async fn remove_job(&self, job_id: &str) -> SchedulerResult<()> {
        self.remove_internal(job_id).await?;
        tracing::info!(target: TRACING_TARGET, job_id, "Job removed");
        Ok(())
    }

    async fn list_jobs(&self) -> SchedulerResult<Vec<JobDescriptor>> {
        let jobs = self.jobs.lock().expect("job map poisoned");
        Ok(jobs
            .iter()
            .map(|(job_id, entry)| {
                let last_fired_at = *entry.last_fired_at.lock().expect("job map poisoned");
                JobDescriptor {
                    job_id: job_id.clone(),
                    schedule: entry.schedule.clone(),
                    last_fired_at,
                    next_fire_at: Self::next_fire_at(&entry.schedule, last_fired_at),
                }
            })
            .collect())
    }

    async fn get_job(&self, job_id: &str) -> SchedulerResult<Option<JobDescriptor>> {
        let jobs = self.jobs.lock().expect("job map poisoned");
        Ok(jobs.get(job_id).map(|entry| {
            let last_fired_at = *entry.last_fired_at.lock().expect("job map poisoned");
            JobDescriptor {
                job_id: job_id.to_string(),
                schedule: entry.schedule.clone(),
                last_fired_at,
                next_fire_at: Self::next_fire_at(&entry.schedule, last_fired_at),
            }
        }))
    }

    async fn reschedule_job(&self, job_id: &str, schedule: JobSchedule) -> SchedulerResult<()> {
        let callback = {
            let jobs = self.jobs.lock().expect("job map poisoned");
            jobs.get(job_id)
                .ok_or_else(|| SchedulerError::JobNotFound(job_id.to_string()))?
                .callback
                .clone()
        };

        self.add_job(job_id, schedule, callback).await
    }

    async fn sync_all_recurring_tasks(&self, resolve: JobResolver) -> SchedulerResult<()> {
        use floww_postgres::query::RecurringTaskRepository;

        let mut conn = self.client.get_connection().await?;
        let tasks = conn.list_recurring_tasks().await?;

        let mut desired = std::collections::HashSet::new();
        for task in &tasks {
            let job_id = recurring_task_job_id(task.trigger_id);
            desired.insert(job_id.clone());

            match resolve(task.trigger_id).await {
                Some((schedule, callback)) => {
                    self.add_job(&job_id, schedule, callback).await?;
                }
                None => {
                    tracing::warn!(target: TRACING_TARGET, trigger_id = %task.trigger_id, "Recurring task has no resolvable schedule, removing job");
                    self.remove_internal(&job_id).await?;
                }
            }
        }

        let orphaned: Vec<String> = {
            let jobs = self.jobs.lock().expect("job map poisoned");
            jobs.keys()
                .filter(|job_id| job_id.starts_with(RECURRING_TASK_JOB_PREFIX) && !desired.contains(*job_id))
                .cloned()
                .collect()
        };

        for job_id in orphaned {
            tracing::info!(target: TRACING_TARGET, job_id, "Removing orphaned recurring job");
            self.remove_internal(&job_id).await?;
        }

        Ok(())
    }
}
