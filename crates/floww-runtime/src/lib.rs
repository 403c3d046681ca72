#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod backend;
mod container;
mod error;
mod function;
mod image;
mod payload;
mod pod;
mod registry;

pub use backend::{RuntimeBackend, RuntimeConfig, RuntimeStatus, RuntimeStatusKind};
pub use container::{ContainerBackend, ContainerBackendConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use function::{FunctionBackend, FunctionBackendConfig};
pub use image::{HttpImageResolver, ImageDigest, ImageResolver, PassthroughImageResolver};
pub use payload::{EventData, TriggerDescriptor, TriggerProvider, V2Payload};
pub use pod::PodBackend;
pub use registry::RuntimeKind;

/// Tracing target for runtime backend operations.
pub const TRACING_TARGET: &str = "floww_runtime";
