//! Error types for scheduler operations.

use thiserror::Error;

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Errors that can occur while managing scheduled jobs.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The underlying cron expression failed to parse.
    #[error("invalid cron expression '{expression}': {message}")]
    InvalidExpression {
        /// The offending expression.
        expression: String,
        /// Parser error message.
        message: String,
    },

    /// No job is registered under the given ID.
    #[error("job '{0}' not found")]
    JobNotFound(String),

    /// The in-process scheduler failed to start or accept a job.
    #[error("scheduler backend error: {0}")]
    Backend(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// A database operation against the durable recurring-task store failed.
    #[error("database error: {0}")]
    Database(#[from] floww_postgres::PgError),
}
