#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod service;
pub mod signature;

pub mod request;
pub mod response;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use error::{Error, ErrorKind, Result};
pub use floww_core::{ServiceHealth, ServiceStatus};
pub use request::{OutboundMethod, OutboundRequest, WebhookEnvelope};
pub use response::DeliveryResponse;
pub use service::{OutboundDelivery, WebhookService};

/// Tracing target for webhook operations.
pub const TRACING_TARGET: &str = "floww_webhook";
