//! Process configuration, assembled via `clap` derive + environment
//! variables so the same struct serves both CLI flags and container env.

use std::time::Duration;

use floww_postgres::{PgClient, PgConfig, PgResult};
use floww_runtime::RuntimeKind;
use url::Url;

#[cfg(feature = "config")]
use clap::Args;

/// Top-level service configuration.
#[derive(Clone)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ServiceConfig {
    #[cfg_attr(feature = "config", command(flatten))]
    pub postgres_config: PgConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    pub dispatch_config: DispatchConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    pub scheduler_config: SchedulerStoreConfig,
}

impl ServiceConfig {
    /// Connects to PostgreSQL and verifies connectivity.
    pub async fn connect_postgres(&self) -> PgResult<PgClient> {
        PgClient::new_with_test(self.postgres_config.clone()).await
    }
}

/// Settings governing the runtime backend, workflow invocation JWTs, and
/// at-rest encryption.
#[derive(Clone)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct DispatchConfig {
    /// Which backend provisions and invokes workflow code.
    #[cfg_attr(feature = "config", arg(long = "runtime-type", env = "RUNTIME_TYPE", default_value = "docker"))]
    pub runtime_type: RuntimeKind,

    /// Externally reachable base URL this service is deployed at, used to
    /// build absolute webhook URLs and the `backendUrl` invocation callback.
    #[cfg_attr(feature = "config", arg(long = "public-api-url", env = "PUBLIC_API_URL"))]
    pub public_api_url: Url,

    /// HMAC secret for signing workflow invocation JWTs.
    #[cfg_attr(feature = "config", arg(long = "workflow-jwt-secret", env = "WORKFLOW_JWT_SECRET"))]
    pub workflow_jwt_secret: String,

    /// JWT signing algorithm name, currently only `HS256` is supported.
    #[cfg_attr(feature = "config", arg(long = "workflow-jwt-algorithm", env = "WORKFLOW_JWT_ALGORITHM", default_value = "HS256"))]
    pub workflow_jwt_algorithm: String,

    /// Workflow invocation token lifetime, in seconds.
    #[cfg_attr(feature = "config", arg(long = "workflow-jwt-expiration-seconds", env = "WORKFLOW_JWT_EXPIRATION_SECONDS", default_value = "300"))]
    pub workflow_jwt_expiration_seconds: u64,

    /// How long a container/function execution unit may sit idle before
    /// `teardown_unused_runtimes` reclaims it.
    #[cfg_attr(feature = "config", arg(long = "container-idle-timeout", env = "CONTAINER_IDLE_TIMEOUT", default_value = "300"))]
    pub container_idle_timeout_secs: u64,

    /// Hex-encoded 256-bit key used to decrypt `providers.encrypted_config`
    /// and `secrets.encrypted_value`.
    #[cfg_attr(feature = "config", arg(long = "secret-key", env = "FLOWW_SECRET_KEY"))]
    pub secret_key: String,
}

impl DispatchConfig {
    pub fn workflow_jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.workflow_jwt_expiration_seconds)
    }

    pub fn container_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.container_idle_timeout_secs)
    }

    pub fn encryption_key(&self) -> floww_core::crypto::CryptoResult<floww_core::crypto::EncryptionKey> {
        floww_core::crypto::EncryptionKey::from_hex(&self.secret_key)
    }
}

/// Settings for the durable scheduler job store.
#[derive(Clone)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct SchedulerStoreConfig {
    /// Postgres table used for advisory-lock-keyed job bookkeeping.
    #[cfg_attr(feature = "config", arg(long = "scheduler-jobs-table", env = "SCHEDULER_JOBS_TABLE", default_value = "recurring_tasks"))]
    pub jobs_table: String,

    /// Timezone ticks are evaluated in; the scheduler is UTC-only.
    #[cfg_attr(feature = "config", arg(long = "scheduler-timezone", env = "SCHEDULER_TIMEZONE", default_value = "UTC"))]
    pub timezone: String,
}
