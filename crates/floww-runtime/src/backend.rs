//! The runtime backend abstraction: uniform creation, status, and
//! invocation across container/function/pod execution units.

use std::collections::HashMap;

use strum::{AsRefStr, Display};

use crate::error::RuntimeResult;
use crate::payload::V2Payload;

/// Configuration for a single execution unit, addressed by `runtime_id` and
/// backed by an image resolved to a digest-pinned reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stable identifier for this execution unit, used as the container
    /// label / function deployment name.
    pub runtime_id: String,
    /// Digest-pinned image reference to run.
    pub image_digest: String,
    /// Environment variables passed through to the execution unit.
    pub env: HashMap<String, String>,
}

impl RuntimeConfig {
    /// Creates a config referencing the given runtime and image digest,
    /// with no extra environment.
    pub fn new(runtime_id: impl Into<String>, image_digest: impl Into<String>) -> Self {
        Self { runtime_id: runtime_id.into(), image_digest: image_digest.into(), env: HashMap::new() }
    }
}

/// The provisioning state of an execution unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RuntimeStatusKind {
    InProgress,
    Completed,
    Failed,
}

/// The result of a `create_runtime`/`get_runtime_status` probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeStatus {
    pub status: RuntimeStatusKind,
    pub logs: Vec<String>,
}

impl RuntimeStatus {
    /// Shorthand for an immediately-completed status with no logs.
    pub fn completed() -> Self {
        Self { status: RuntimeStatusKind::Completed, logs: Vec::new() }
    }

    /// Shorthand for an in-progress status with the given logs so far.
    pub fn in_progress(logs: Vec<String>) -> Self {
        Self { status: RuntimeStatusKind::InProgress, logs }
    }

    /// Shorthand for a failed status carrying the failure's log lines.
    pub fn failed(logs: Vec<String>) -> Self {
        Self { status: RuntimeStatusKind::Failed, logs }
    }
}

/// Uniform interface to provision, probe, and invoke an execution unit for
/// workflow code, regardless of which concrete backend is configured.
///
/// `invoke_trigger` is fire-and-forget from the dispatcher's perspective:
/// it returns once the payload has been handed to the backend, not once
/// workflow code has finished running.
#[async_trait::async_trait]
pub trait RuntimeBackend: Send + Sync {
    /// Idempotently provisions an execution unit for `config`. Returns
    /// immediately; long-running provisioning is observed via
    /// [`get_runtime_status`](Self::get_runtime_status).
    async fn create_runtime(&self, config: &RuntimeConfig) -> RuntimeResult<RuntimeStatus>;

    /// Non-mutating probe of a previously created execution unit.
    async fn get_runtime_status(&self, runtime_id: &str) -> RuntimeResult<RuntimeStatus>;

    /// Delivers `payload` to the execution unit described by `config`,
    /// provisioning it first if necessary. Invocation errors are returned
    /// to the caller to record, never panicked on.
    async fn invoke_trigger(&self, config: &RuntimeConfig, payload: &V2Payload) -> RuntimeResult<()>;

    /// Periodic maintenance: reclaims execution units that have been idle
    /// past the backend's configured timeout. A no-op for backends with no
    /// standing resources to reclaim (e.g. the pod backend).
    async fn teardown_unused_runtimes(&self) -> RuntimeResult<()>;
}
