//! Middleware for `axum::Router` and HTTP request processing.
//!
//! # Middleware ordering
//!
//! Axum applies layers in reverse order: the last layer added wraps the
//! outermost request handling. From outermost to innermost:
//!
//! 1. **Recovery** - catches panics and enforces request timeouts, so every
//!    error below this layer is converted to the HTTP-facing [`Error`].
//! 2. **Observability** - assigns a request ID and opens a tracing span
//!    early, so everything below is instrumented.
//! 3. **Security** - CORS, security headers, and body size limits, applied
//!    before any handler sees the request.
//!
//! ```ignore
//! Router::new()
//!     .with_default_security()
//!     .with_observability()
//!     .with_default_recovery()
//! ```
//!
//! [`Error`]: crate::error::Error

mod observability;
mod recovery;
mod security;

pub use observability::{DefaultRequestIdMaker, RouterObservabilityExt};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, DEFAULT_MAX_BODY_SIZE, FrameOptions, ReferrerPolicy, RouterSecurityExt, SecurityHeadersConfig};
