#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod adapter;
mod error;
pub mod lifecycle;
pub mod providers;
mod registry;
pub mod utils;

pub use adapter::{Adapter, EarlyResponse, ProviderContext};
pub use error::{ProviderError, ProviderResult, TriggerSyncFailure};
pub use lifecycle::{sync, DesiredTrigger, SyncContext, SyncOutcome, TriggerIdentity};
pub use registry::adapter_for;
pub use utils::{DefaultTriggerUtils, RegisterWebhookRequest, RegisteredWebhook, TriggerUtils, WebhookOwner};

/// Tracing target for provider reconcile and matching operations.
pub const TRACING_TARGET: &str = "floww_providers";
