//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig         # Host, port, TLS, shutdown
//! ├── middleware: MiddlewareConfig # CORS, security headers, recovery
//! ├── service: ServiceConfig       # Postgres, dispatch (JWT, encryption), scheduler store
//! ├── runtime: RuntimeConfig       # Container/function backend + image registry
//! ├── http: ReqwestConfig          # Outbound HTTP client for webhook delivery
//! └── telemetry: TelemetryConfig   # Anonymized usage/crash reporting
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! floww --postgres-url "postgresql://..." --port 8080
//! POSTGRES_URL="postgresql://..." PORT=8080 floww
//! ```

mod middleware;
mod runtime;
mod server;
mod telemetry;

use std::process;

use anyhow::Context;
use clap::Parser;
use floww_server::service::ServiceConfig;
pub use middleware::MiddlewareConfig;
pub use runtime::RuntimeConfig;
pub use server::{ServerConfig, log_server_config};
pub use telemetry::TelemetryConfig;

use crate::TRACING_TARGET_CONFIG;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "floww")]
#[command(about = "floww trigger dispatch and execution backend")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, security headers, recovery).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Database, dispatch, and scheduler store configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Runtime backend configuration (container/function/registry).
    #[clap(flatten)]
    pub runtime: RuntimeConfig,

    /// Outbound HTTP client configuration used for webhook delivery.
    #[clap(flatten)]
    pub http: floww_webhook::reqwest::ReqwestConfig,

    /// Anonymized usage/crash telemetry configuration.
    #[clap(flatten)]
    pub telemetry: TelemetryConfig,
}

impl Cli {
    /// Loads environment variables from a `.env` file (if enabled) and parses CLI arguments.
    ///
    /// `.env` is loaded before clap parses arguments, so its values can feed
    /// `env`-backed CLI defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server.validate().context("invalid server configuration")?;
        self.telemetry.validate().context("invalid telemetry configuration")?;
        Ok(())
    }

    /// Logs configuration at debug/info level. Secrets (JWT/encryption keys,
    /// Postgres URL) are deliberately excluded.
    pub fn log(&self) {
        Self::log_build_info();
        log_server_config(&self.server);

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            runtime_type = %self.service.dispatch_config.runtime_type,
            public_api_url = %self.service.dispatch_config.public_api_url,
            container_idle_timeout_secs = self.service.dispatch_config.container_idle_timeout_secs,
            "dispatch configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            postgres_max_connections = self.service.postgres_config.postgres_max_connections,
            postgres_connection_timeout_secs = ?self.service.postgres_config.postgres_connection_timeout_secs,
            postgres_idle_timeout_secs = ?self.service.postgres_config.postgres_idle_timeout_secs,
            "database configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            scheduler_jobs_table = %self.service.scheduler_config.jobs_table,
            scheduler_timezone = %self.service.scheduler_config.timezone,
            "scheduler configuration"
        );
    }

    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "build information"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "tls").then_some("tls"), cfg!(feature = "otel").then_some("otel"), cfg!(feature = "dotenv").then_some("dotenv"), cfg!(feature = "telemetry").then_some("telemetry")]
            .into_iter()
            .flatten()
            .collect()
    }
}
