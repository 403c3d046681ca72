//! Pod backend: a pod-orchestrator stub. Pods materialize on demand, so
//! creation is a no-op; other operations preserve the trait's interface
//! without a concrete implementation in this spec.

use crate::backend::{RuntimeBackend, RuntimeConfig, RuntimeStatus};
use crate::error::{RuntimeError, RuntimeResult};
use crate::payload::V2Payload;

/// No-op [`RuntimeBackend`] for a pod orchestrator. Kept as a real,
/// wired-in backend (rather than omitted) so `RUNTIME_TYPE=kubernetes`
/// selects a working, if stubbed, implementation.
#[derive(Debug, Clone, Default)]
pub struct PodBackend;

#[async_trait::async_trait]
impl RuntimeBackend for PodBackend {
    async fn create_runtime(&self, _config: &RuntimeConfig) -> RuntimeResult<RuntimeStatus> {
        Ok(RuntimeStatus::completed())
    }

    async fn get_runtime_status(&self, runtime_id: &str) -> RuntimeResult<RuntimeStatus> {
        Err(RuntimeError::RuntimeNotFound(runtime_id.to_string()))
    }

    async fn invoke_trigger(&self, config: &RuntimeConfig, _payload: &V2Payload) -> RuntimeResult<()> {
        Err(RuntimeError::Internal(format!("pod backend invocation is not implemented (runtime '{}')", config.runtime_id)))
    }

    async fn teardown_unused_runtimes(&self) -> RuntimeResult<()> {
        Ok(())
    }
}
