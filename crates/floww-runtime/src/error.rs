//! Error types for runtime backend operations.

use thiserror::Error;

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur while provisioning or invoking an execution unit.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// No runtime is registered under the given ID.
    #[error("runtime '{0}' not found")]
    RuntimeNotFound(String),

    /// The container backend's Docker engine call failed.
    #[error("container engine error: {0}")]
    Container(#[from] bollard::errors::Error),

    /// An HTTP call to a function endpoint or container `/execute` failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A container failed to report healthy within the bounded wait.
    #[error("runtime '{runtime_id}' did not become healthy within {timeout_secs}s")]
    NotReady {
        /// The runtime that failed to come up.
        runtime_id: String,
        /// How long we waited before giving up.
        timeout_secs: u64,
    },

    /// Invocation reached the backend but it reported a non-success status.
    #[error("runtime '{runtime_id}' invocation failed with status {status}")]
    InvocationFailed {
        /// The runtime invoked.
        runtime_id: String,
        /// The HTTP status the backend returned.
        status: u16,
    },

    /// The configured image reference could not be resolved to a digest.
    #[error("image hash '{0}' could not be resolved to a digest-pinned reference")]
    UnresolvedImage(String),

    /// (De)serialization of a runtime payload failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for conditions not covered by a more specific variant.
    #[error("internal error: {0}")]
    Internal(String),
}
