//! Runtime backend selection.
//!
//! `floww-server`'s [`DispatchConfig`] parses *which* backend `RUNTIME_TYPE`
//! names, but doesn't build one — the concrete backend and image resolver
//! depend on configuration it has no reason to own. This module is that
//! assembly step, the bootstrap's equivalent of selecting an AI service
//! provider by feature flag in a document-processing CLI, except the
//! selection happens at runtime against a single compiled-in set of
//! backends rather than at compile time against mutually exclusive ones.
//!
//! [`DispatchConfig`]: floww_server::service::DispatchConfig

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use floww_runtime::{ContainerBackend, ContainerBackendConfig, FunctionBackend, FunctionBackendConfig, HttpImageResolver, ImageResolver, PassthroughImageResolver, PodBackend, RuntimeBackend, RuntimeKind};
use serde::{Deserialize, Serialize};
use url::Url;

/// Tunables for whichever backend `RUNTIME_TYPE` selects.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct RuntimeConfig {
    /// Docker network the container backend attaches runtimes to.
    #[arg(long = "container-network", env = "CONTAINER_NETWORK", default_value = "floww-runtimes")]
    pub container_network: String,

    /// Port the user container's HTTP server listens on.
    #[arg(long = "container-http-port", env = "CONTAINER_HTTP_PORT", default_value_t = 8000)]
    pub container_http_port: u16,

    /// Bounded wait for a container's `/health` to return 200 after start.
    #[arg(long = "container-health-timeout-secs", env = "CONTAINER_HEALTH_TIMEOUT", default_value_t = 30)]
    pub container_health_timeout_secs: u64,

    /// Timeout for the `/execute` POST to a container or function runtime.
    #[arg(long = "runtime-invoke-timeout-secs", env = "RUNTIME_INVOKE_TIMEOUT", default_value_t = 60)]
    pub invoke_timeout_secs: u64,

    /// Base URL of the managed function-as-a-service endpoint. Required
    /// when `RUNTIME_TYPE=lambda`.
    #[arg(long = "function-backend-url", env = "FUNCTION_BACKEND_URL")]
    pub function_backend_url: Option<Url>,

    /// Base URL of the container registry used to resolve `image_hash` to
    /// a digest-pinned reference. Unset means image hashes pass through
    /// unresolved.
    #[arg(long = "registry-url", env = "REGISTRY_URL")]
    pub registry_url: Option<Url>,
}

impl RuntimeConfig {
    /// Builds the [`RuntimeBackend`] named by `kind`.
    pub fn build_backend(&self, kind: RuntimeKind, idle_timeout: Duration) -> anyhow::Result<Arc<dyn RuntimeBackend>> {
        match kind {
            RuntimeKind::Docker => {
                let config = ContainerBackendConfig {
                    network: self.container_network.clone(),
                    health_timeout: Duration::from_secs(self.container_health_timeout_secs),
                    invoke_timeout: Duration::from_secs(self.invoke_timeout_secs),
                    idle_timeout,
                    http_port: self.container_http_port,
                };
                Ok(Arc::new(ContainerBackend::connect(config).context("failed to connect to the Docker daemon")?))
            }
            RuntimeKind::Lambda => {
                let endpoint = self.function_backend_url.clone().context("FUNCTION_BACKEND_URL is required when RUNTIME_TYPE=lambda")?;
                let config = FunctionBackendConfig { endpoint, invoke_timeout: Duration::from_secs(self.invoke_timeout_secs) };
                Ok(Arc::new(FunctionBackend::new(config).context("failed to build the function backend client")?))
            }
            RuntimeKind::Kubernetes => Ok(Arc::new(PodBackend)),
        }
    }

    /// Builds the [`ImageResolver`] paired with `kind`.
    pub fn build_image_resolver(&self, kind: RuntimeKind) -> Arc<dyn ImageResolver> {
        match (kind, &self.registry_url) {
            (RuntimeKind::Kubernetes, _) => Arc::new(PassthroughImageResolver),
            (_, Some(registry_url)) => Arc::new(HttpImageResolver::new(registry_url.clone())),
            (_, None) => Arc::new(PassthroughImageResolver),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> RuntimeConfig {
        RuntimeConfig {
            container_network: "floww-runtimes".to_string(),
            container_http_port: 8000,
            container_health_timeout_secs: 30,
            invoke_timeout_secs: 60,
            function_backend_url: None,
            registry_url: None,
        }
    }

    #[test]
    fn kubernetes_always_gets_a_passthrough_resolver() {
        let config = default_config();
        let resolver = config.build_image_resolver(RuntimeKind::Kubernetes);
        let _ = resolver;
    }

    #[test]
    fn lambda_without_an_endpoint_fails_fast() {
        let config = default_config();
        let result = config.build_backend(RuntimeKind::Lambda, Duration::from_secs(300));
        assert!(result.is_err());
    }
}
