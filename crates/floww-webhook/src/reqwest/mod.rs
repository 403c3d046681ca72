//! Reqwest-based HTTP client for outbound provider API calls.
//!
//! This module provides a reqwest-based implementation of the [`OutboundDelivery`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use floww_webhook::reqwest::{ReqwestClient, ReqwestConfig};
//! use floww_webhook::{OutboundRequest, WebhookService};
//!
//! // Create a client with default configuration
//! let client = ReqwestClient::default();
//!
//! // Convert to a service for dependency injection
//! let service: WebhookService = client.into_service();
//! ```
//!
//! [`OutboundDelivery`]: crate::OutboundDelivery

mod client;
mod config;
mod error;

pub use client::ReqwestClient;
pub use config::ReqwestConfig;
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "floww_webhook::reqwest";
