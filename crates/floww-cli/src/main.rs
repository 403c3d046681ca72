#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;
mod telemetry;

use std::process;
use std::sync::Arc;
use std::time::Instant;

use aide::openapi::OpenApi;
use anyhow::Context;
use axum::Router;
use floww_core::PermissiveQuotaCheck;
use floww_scheduler::{JobStore, PgJobStore};
use floww_server::middleware::{RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt};
use floww_server::service::ServiceState;
use floww_webhook::reqwest::ReqwestClient;
use tokio_cron_scheduler::JobScheduler;

use crate::config::{Cli, MiddlewareConfig};
#[cfg(feature = "telemetry")]
use crate::telemetry::TelemetryContext;
#[cfg(feature = "telemetry")]
use crate::telemetry::helpers::{send_crash_telemetry, send_shutdown_telemetry, send_startup_telemetry};

/// Tracing target for server startup/readiness events.
pub const TRACING_TARGET_SERVER_STARTUP: &str = "floww_cli::server::startup";
/// Tracing target for server shutdown and fatal errors.
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "floww_cli::server::shutdown";
/// Tracing target for configuration logging.
pub const TRACING_TARGET_CONFIG: &str = "floww_cli::config";
/// Tracing target for telemetry reporting.
pub const TRACING_TARGET_TELEMETRY: &str = "floww_cli::telemetry";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing();
    cli.validate()?;
    cli.log();

    #[cfg(feature = "telemetry")]
    let telemetry_context = Some(TelemetryContext::new(cli.telemetry.clone(), cli.telemetry.enabled));

    let state = create_service_state(&cli).await?;
    let router = create_router(state, &cli.middleware);
    let server_config = cli.server.clone();

    #[cfg(feature = "telemetry")]
    send_startup_telemetry(telemetry_context.as_ref(), &server_config, "floww-server");

    #[cfg_attr(not(feature = "telemetry"), allow(unused_variables))]
    let start_time = Instant::now();
    let result = server::serve(router, server_config.clone()).await;

    #[cfg(feature = "telemetry")]
    match &result {
        Ok(()) => send_shutdown_telemetry(telemetry_context.as_ref(), &server_config, start_time.elapsed(), "floww-server"),
        Err(error) => send_crash_telemetry(telemetry_context.as_ref(), error, start_time.elapsed(), &server_config, "floww-server"),
    }

    result.context("server terminated with an error")
}

/// Connects to PostgreSQL once and assembles the runtime backend, job
/// store, and outbound delivery implementations the router's handlers
/// depend on.
async fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    let pg_client = cli
        .service
        .connect_postgres()
        .await
        .context("failed to connect to PostgreSQL")?;

    let scheduler = JobScheduler::new()
        .await
        .context("failed to create the job scheduler")?;
    scheduler
        .start()
        .await
        .context("failed to start the job scheduler")?;
    let job_store = Arc::new(PgJobStore::new(pg_client.clone(), scheduler));

    let runtime_type = cli.service.dispatch_config.runtime_type;
    let idle_timeout = cli.service.dispatch_config.container_idle_timeout();
    let runtime_backend = cli
        .runtime
        .build_backend(runtime_type, idle_timeout)
        .context("failed to build the runtime backend")?;
    let image_resolver = cli.runtime.build_image_resolver(runtime_type);

    let delivery = ReqwestClient::new(cli.http.clone()).into_service();
    let quota_check = Arc::new(PermissiveQuotaCheck);

    let state = ServiceState::new(
        pg_client,
        job_store,
        runtime_backend,
        image_resolver,
        delivery,
        quota_check,
        &cli.service.dispatch_config,
    )
    .context("failed to assemble service state")?;

    state
        .job_store()
        .sync_all_recurring_tasks(floww_server::cron::cron_job_resolver(state.clone()))
        .await
        .context("failed to sync recurring tasks at startup")?;

    Ok(state)
}

/// Builds the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS, security headers, and body size limits
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    let mut api = OpenApi::default();
    let api_routes: Router = floww_server::handler::routes().with_state(state).finish_api(&mut api);

    api_routes
        .with_security(&middleware.cors, &middleware.security_headers, middleware.max_body_size)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
