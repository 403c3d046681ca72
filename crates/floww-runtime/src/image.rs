//! Resolves a workflow's configured `image_hash` to a digest-pinned image
//! reference before the dispatcher invokes a runtime.

use std::time::Duration;

use url::Url;

use crate::error::{RuntimeError, RuntimeResult};

/// A digest-pinned image reference, e.g. `registry.floww.dev/acme/workflow@sha256:...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDigest(pub String);

impl std::fmt::Display for ImageDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves an `image_hash` reference to a digest-pinned one.
///
/// The container and function backends need a stable, content-addressed
/// reference so a tag update can't silently change what a running
/// deployment executes; the pod backend lets the orchestrator resolve tags
/// itself and uses [`PassthroughImageResolver`].
#[async_trait::async_trait]
pub trait ImageResolver: Send + Sync {
    /// Resolves `image_hash` to a digest-pinned reference, or `None` if the
    /// registry has no such image.
    async fn resolve(&self, image_hash: &str) -> RuntimeResult<Option<ImageDigest>>;
}

/// Resolves against a Docker Registry HTTP API v2 endpoint by issuing a HEAD
/// request for the tag's manifest and reading back `Docker-Content-Digest`.
pub struct HttpImageResolver {
    client: reqwest::Client,
    registry_url: Url,
}

impl HttpImageResolver {
    /// Creates a resolver against the given registry base URL
    /// (e.g. `https://registry.floww.dev/v2/acme/workflows`).
    pub fn new(registry_url: Url) -> Self {
        Self {
            client: reqwest::Client::builder().timeout(Duration::from_secs(10)).build().unwrap_or_default(),
            registry_url,
        }
    }
}

#[async_trait::async_trait]
impl ImageResolver for HttpImageResolver {
    async fn resolve(&self, image_hash: &str) -> RuntimeResult<Option<ImageDigest>> {
        let url = self
            .registry_url
            .join(&format!("manifests/{image_hash}"))
            .map_err(|error| RuntimeError::Internal(error.to_string()))?;

        let response = self
            .client
            .head(url)
            .header("Accept", "application/vnd.docker.distribution.manifest.v2+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let digest = response.headers().get("Docker-Content-Digest").and_then(|value| value.to_str().ok());

        Ok(digest.map(|digest| ImageDigest(format!("{}@{digest}", self.registry_url.path().trim_end_matches('/').trim_start_matches('/')))))
    }
}

/// Resolves by treating `image_hash` as already digest-pinned. Used by the
/// pod backend, whose orchestrator owns tag-to-digest resolution itself.
pub struct PassthroughImageResolver;

#[async_trait::async_trait]
impl ImageResolver for PassthroughImageResolver {
    async fn resolve(&self, image_hash: &str) -> RuntimeResult<Option<ImageDigest>> {
        Ok(Some(ImageDigest(image_hash.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passthrough_resolver_echoes_the_hash() {
        let resolver = PassthroughImageResolver;
        let resolved = resolver.resolve("sha256:abc").await.unwrap();
        assert_eq!(resolved, Some(ImageDigest("sha256:abc".to_string())));
    }
}
