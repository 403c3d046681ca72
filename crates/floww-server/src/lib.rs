#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! HTTP API surface for the trigger-dispatch backend: event ingress
//! (webhooks and manual invokes), execution reporting, and the shared
//! dispatcher that mints runtime invocations.

/// Tracing target for trigger reconciliation (provider sync) operations.
pub const TRACING_TARGET_RECONCILE: &str = "floww_server::reconcile";

/// Tracing target for inbound webhook/event ingress.
pub const TRACING_TARGET_INGRESS: &str = "floww_server::ingress";

/// Tracing target for the execution dispatcher.
pub const TRACING_TARGET_DISPATCH: &str = "floww_server::dispatch";

/// Tracing target for execution status reporting callbacks.
pub const TRACING_TARGET_EXECUTIONS: &str = "floww_server::executions";

pub mod cron;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use error::{Error, ErrorKind};
pub use service::state::ServiceState;
