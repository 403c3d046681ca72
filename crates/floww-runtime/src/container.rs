//! Container backend: long-lived warm Docker containers, reachable by DNS
//! name equal to the container name on the backend's own network.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, ListContainersOptions, LogsOptions, RemoveContainerOptions, StartContainerOptions,
};
use bollard::models::{ContainerStateStatusEnum, HostConfig};
use futures::StreamExt;
use jiff::Timestamp;

use crate::backend::{RuntimeBackend, RuntimeConfig, RuntimeStatus};
use crate::error::{RuntimeError, RuntimeResult};
use crate::payload::V2Payload;

/// Marks a container as a floww-managed runtime, distinguishing it from
/// anything else sharing the Docker host.
const RUNTIME_LABEL: &str = "floww.runtime";
const IMAGE_HASH_LABEL: &str = "floww.image_hash";

/// Tunables for [`ContainerBackend`], all with sensible production defaults.
#[derive(Debug, Clone)]
pub struct ContainerBackendConfig {
    /// Docker network runtimes are attached to, so they can reach each
    /// other and the backend by container name.
    pub network: String,
    /// Bounded wait for `/health` to return 200 after starting a container.
    pub health_timeout: Duration,
    /// Timeout for the `/execute` POST.
    pub invoke_timeout: Duration,
    /// How long a container may sit with no non-health activity before reaping.
    pub idle_timeout: Duration,
    /// Port the user container's HTTP server listens on.
    pub http_port: u16,
}

impl Default for ContainerBackendConfig {
    fn default() -> Self {
        Self {
            network: "floww-runtimes".to_string(),
            health_timeout: Duration::from_secs(30),
            invoke_timeout: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(300),
            http_port: 8000,
        }
    }
}

/// Docker-backed [`RuntimeBackend`] managing warm containers.
pub struct ContainerBackend {
    docker: Docker,
    http: reqwest::Client,
    config: ContainerBackendConfig,
}

impl ContainerBackend {
    /// Connects to the local Docker daemon using the standard environment
    /// (`DOCKER_HOST`, or the platform default socket).
    pub fn connect(config: ContainerBackendConfig) -> RuntimeResult<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self { docker, http, config })
    }

    fn container_name(runtime_id: &str) -> String {
        format!("floww-runtime-{runtime_id}")
    }

    fn base_url(runtime_id: &str, port: u16) -> String {
        format!("http://{}:{port}", Self::container_name(runtime_id))
    }

    async fn inspect(&self, runtime_id: &str) -> RuntimeResult<Option<bollard::models::ContainerInspectResponse>> {
        match self.docker.inspect_container(&Self::container_name(runtime_id), None::<InspectContainerOptions>).await {
            Ok(inspected) => Ok(Some(inspected)),
            Err(bollard::errors::Error::DockerResponseServerError { status_code: 404, .. }) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn ensure_running(&self, config: &RuntimeConfig) -> RuntimeResult<()> {
        let name = Self::container_name(&config.runtime_id);

        let running = match self.inspect(&config.runtime_id).await? {
            Some(inspected) => inspected.state.and_then(|state| state.running).unwrap_or(false),
            None => {
                self.create(config, &name).await?;
                false
            }
        };

        if !running {
            self.docker.start_container(&name, None::<StartContainerOptions>).await?;
        }

        self.wait_healthy(&config.runtime_id).await
    }

    async fn create(&self, config: &RuntimeConfig, name: &str) -> RuntimeResult<()> {
        let mut labels = HashMap::new();
        labels.insert(RUNTIME_LABEL.to_string(), "true".to_string());
        labels.insert(IMAGE_HASH_LABEL.to_string(), config.image_digest.clone());

        let env: Vec<String> = config.env.iter().map(|(key, value)| format!("{key}={value}")).collect();

        let options = CreateContainerOptions { name: name.to_string(), platform: None };
        let docker_config = Config {
            image: Some(config.image_digest.clone()),
            labels: Some(labels),
            env: Some(env),
            host_config: Some(HostConfig { network_mode: Some(self.config.network.clone()), ..Default::default() }),
            ..Default::default()
        };

        self.docker.create_container(Some(options), docker_config).await?;
        Ok(())
    }

    async fn wait_healthy(&self, runtime_id: &str) -> RuntimeResult<()> {
        let deadline = tokio::time::Instant::now() + self.config.health_timeout;
        let url = format!("{}/health", Self::base_url(runtime_id, self.config.http_port));

        loop {
            if let Ok(response) = self.http.get(&url).send().await {
                if response.status().is_success() {
                    return Ok(());
                }
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(RuntimeError::NotReady { runtime_id: runtime_id.to_string(), timeout_secs: self.config.health_timeout.as_secs() });
            }

            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }

    async fn runtime_containers(&self) -> RuntimeResult<Vec<bollard::models::ContainerSummary>> {
        let mut filters = HashMap::new();
        filters.insert("label".to_string(), vec![format!("{RUNTIME_LABEL}=true")]);

        let options = ListContainersOptions { all: true, filters, ..Default::default() };
        Ok(self.docker.list_containers(Some(options)).await?)
    }

    /// The latest log line not produced by a `/health` probe, per the
    /// spec's idle-detection contract; falls back to the container's start
    /// time if every log line is a health probe (or there are none).
    async fn last_activity(&self, container_id: &str, started_at: Option<Timestamp>) -> RuntimeResult<Option<Timestamp>> {
        let options = LogsOptions::<String> { stdout: true, stderr: true, timestamps: true, tail: "500".to_string(), ..Default::default() };
        let mut stream = self.docker.logs(container_id, Some(options));

        let mut latest: Option<Timestamp> = None;
        while let Some(chunk) = stream.next().await {
            let Ok(log) = chunk else { continue };
            let text = String::from_utf8_lossy(&log.into_bytes()).into_owned();
            if text.contains("/health") {
                continue;
            }
            let Some((stamp, _rest)) = text.split_once(' ') else { continue };
            if let Ok(parsed) = Timestamp::from_str(stamp) {
                latest = Some(latest.map_or(parsed, |current| current.max(parsed)));
            }
        }

        Ok(latest.or(started_at))
    }
}

#[async_trait::async_trait]
impl RuntimeBackend for ContainerBackend {
    async fn create_runtime(&self, config: &RuntimeConfig) -> RuntimeResult<RuntimeStatus> {
        if self.inspect(&config.runtime_id).await?.is_none() {
            self.create(config, &Self::container_name(&config.runtime_id)).await?;
        }
        Ok(RuntimeStatus::completed())
    }

    async fn get_runtime_status(&self, runtime_id: &str) -> RuntimeResult<RuntimeStatus> {
        let Some(inspected) = self.inspect(runtime_id).await? else {
            return Err(RuntimeError::RuntimeNotFound(runtime_id.to_string()));
        };

        let status = match inspected.state.and_then(|state| state.status) {
            Some(ContainerStateStatusEnum::RUNNING) => crate::backend::RuntimeStatusKind::Completed,
            Some(ContainerStateStatusEnum::CREATED) | Some(ContainerStateStatusEnum::RESTARTING) => crate::backend::RuntimeStatusKind::InProgress,
            _ => crate::backend::RuntimeStatusKind::Failed,
        };

        Ok(RuntimeStatus { status, logs: Vec::new() })
    }

    async fn invoke_trigger(&self, config: &RuntimeConfig, payload: &V2Payload) -> RuntimeResult<()> {
        self.ensure_running(config).await?;

        let url = format!("{}/execute", Self::base_url(&config.runtime_id, self.config.http_port));
        let response = self.http.post(url).timeout(self.config.invoke_timeout).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(RuntimeError::InvocationFailed { runtime_id: config.runtime_id.clone(), status: response.status().as_u16() });
        }

        Ok(())
    }

    async fn teardown_unused_runtimes(&self) -> RuntimeResult<()> {
        for container in self.runtime_containers().await? {
            let Some(id) = container.id.clone() else { continue };
            let name = container.names.as_ref().and_then(|names| names.first()).cloned().unwrap_or_else(|| id.clone());

            let is_running = container.state.as_deref() == Some("running");
            if !is_running {
                if let Err(error) = self.docker.remove_container(&id, Some(RemoveContainerOptions { force: true, ..Default::default() })).await {
                    tracing::warn!(target: crate::TRACING_TARGET, container = %name, %error, "Failed to remove stopped runtime container");
                }
                continue;
            }

            let started_at = match self.inspect_started_at(&id).await {
                Ok(started_at) => started_at,
                Err(error) => {
                    tracing::warn!(target: crate::TRACING_TARGET, container = %name, %error, "Failed to inspect runtime container during reap");
                    continue;
                }
            };

            let last_activity = match self.last_activity(&id, started_at).await {
                Ok(last_activity) => last_activity,
                Err(error) => {
                    tracing::warn!(target: crate::TRACING_TARGET, container = %name, %error, "Failed to read runtime container logs during reap");
                    continue;
                }
            };

            let idle_for = last_activity.map(|activity| Timestamp::now().duration_since(activity)).unwrap_or_default();
            if idle_for.is_negative() {
                continue;
            }
            if idle_for.as_secs() as u64 >= self.config.idle_timeout.as_secs() {
                if let Err(error) = self.docker.remove_container(&id, Some(RemoveContainerOptions { force: true, ..Default::default() })).await {
                    tracing::warn!(target: crate::TRACING_TARGET, container = %name, %error, "Failed to remove idle runtime container");
                } else {
                    tracing::info!(target: crate::TRACING_TARGET, container = %name, "Reaped idle runtime container");
                }
            }
        }

        Ok(())
    }
}

impl ContainerBackend {
    async fn inspect_started_at(&self, container_id: &str) -> RuntimeResult<Option<Timestamp>> {
        let inspected = self.docker.inspect_container(container_id, None::<InspectContainerOptions>).await?;
        Ok(inspected.state.and_then(|state| state.started_at).and_then(|started_at| Timestamp::from_str(&started_at).ok()))
    }
}
