#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod job;
mod lock;
mod pg_store;
mod store;

pub use error::{SchedulerError, SchedulerResult};
pub use job::{JobCallback, JobDescriptor, JobResolver, JobSchedule, RECURRING_TASK_JOB_PREFIX, recurring_task_job_id};
pub use pg_store::PgJobStore;
pub use store::JobStore;

/// Tracing target for scheduler operations.
pub const TRACING_TARGET: &str = "floww_scheduler";
