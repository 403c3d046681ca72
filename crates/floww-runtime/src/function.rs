//! Function backend: short-lived invocations against a managed
//! function-as-a-service endpoint.

use std::time::Duration;

use url::Url;

use crate::backend::{RuntimeBackend, RuntimeConfig, RuntimeStatus, RuntimeStatusKind};
use crate::error::{RuntimeError, RuntimeResult};
use crate::payload::V2Payload;

/// Tunables for [`FunctionBackend`].
#[derive(Debug, Clone)]
pub struct FunctionBackendConfig {
    /// Base URL of the function management API (deploy/status/invoke).
    pub endpoint: Url,
    /// Timeout for the asynchronous invoke enqueue call.
    pub invoke_timeout: Duration,
}

/// A managed-function-service-backed [`RuntimeBackend`].
///
/// Creation uploads the image reference and returns immediately; the
/// service's reported deployment state is mapped onto
/// [`RuntimeStatusKind`]. Invocation enqueues asynchronously and does not
/// wait for the function to finish running.
pub struct FunctionBackend {
    http: reqwest::Client,
    config: FunctionBackendConfig,
}

impl FunctionBackend {
    pub fn new(config: FunctionBackendConfig) -> RuntimeResult<Self> {
        Ok(Self { http: reqwest::Client::builder().build()?, config })
    }

    fn deployments_url(&self) -> Url {
        self.config.endpoint.join("deployments").unwrap_or_else(|_| self.config.endpoint.clone())
    }
}

#[derive(serde::Deserialize)]
struct DeploymentStatusResponse {
    state: String,
    #[serde(default)]
    logs: Vec<String>,
}

fn map_state(state: &str) -> RuntimeStatusKind {
    match state {
        "ready" | "active" => RuntimeStatusKind::Completed,
        "failed" | "error" => RuntimeStatusKind::Failed,
        _ => RuntimeStatusKind::InProgress,
    }
}

#[async_trait::async_trait]
impl RuntimeBackend for FunctionBackend {
    async fn create_runtime(&self, config: &RuntimeConfig) -> RuntimeResult<RuntimeStatus> {
        let response = self
            .http
            .post(self.deployments_url())
            .json(&serde_json::json!({ "runtime_id": config.runtime_id, "image": config.image_digest, "env": config.env }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(RuntimeStatus::failed(vec![format!("deploy request failed with status {}", response.status())]));
        }

        Ok(RuntimeStatus::in_progress(Vec::new()))
    }

    async fn get_runtime_status(&self, runtime_id: &str) -> RuntimeResult<RuntimeStatus> {
        let url = self.deployments_url().join(&format!("{runtime_id}/status")).map_err(|error| RuntimeError::Internal(error.to_string()))?;
        let response = self.http.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RuntimeError::RuntimeNotFound(runtime_id.to_string()));
        }

        let body: DeploymentStatusResponse = response.json().await?;
        Ok(RuntimeStatus { status: map_state(&body.state), logs: body.logs })
    }

    async fn invoke_trigger(&self, config: &RuntimeConfig, payload: &V2Payload) -> RuntimeResult<()> {
        let url = self
            .deployments_url()
            .join(&format!("{}/invoke", config.runtime_id))
            .map_err(|error| RuntimeError::Internal(error.to_string()))?;

        let response = self.http.post(url).timeout(self.config.invoke_timeout).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(RuntimeError::InvocationFailed { runtime_id: config.runtime_id.clone(), status: response.status().as_u16() });
        }

        Ok(())
    }

    async fn teardown_unused_runtimes(&self) -> RuntimeResult<()> {
        // The managed function service owns its own idle scale-to-zero
        // policy; there is no standing resource for us to reclaim here.
        Ok(())
    }
}
