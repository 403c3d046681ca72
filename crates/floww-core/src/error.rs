//! Common error type shared across the core trigger-dispatch pipeline.
//!
//! This module provides a structured error type for the domain layer
//! (registry, lifecycle, scheduler, dispatcher), classifying failures into
//! client vs. server errors and documenting which are safe to retry.

use std::time::Duration;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for core domain operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Domain error for the trigger-dispatch pipeline.
///
/// Carries a classifying [`ErrorKind`], an optional human-readable message,
/// and an optional source error for debugging and error chaining.
#[derive(Debug, thiserror::Error)]
#[error("{}", .message.as_ref().map(|m| format!("{}: {}", .kind, m)).unwrap_or_else(|| .kind.to_string()))]
pub struct Error {
    /// The specific kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional additional message providing more context.
    pub message: Option<String>,
    /// Optional source error for additional context.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: BoxedError) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns true if this is a client error (4xx-style): the caller should
    /// fix the request rather than retry it unmodified.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Validation | ErrorKind::Auth | ErrorKind::NotFound | ErrorKind::Conflict
        )
    }

    /// Returns true if this is a server-side error (5xx-style).
    pub fn is_server_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Internal | ErrorKind::Decryption | ErrorKind::RuntimeInvocation
        )
    }

    /// Returns true if the triggering operation may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::RuntimeInvocation | ErrorKind::ProviderReconcile
        )
    }

    /// Returns the suggested retry delay for retryable errors.
    pub fn retry_delay(&self) -> Option<Duration> {
        match self.kind {
            ErrorKind::RuntimeInvocation => Some(Duration::from_secs(2)),
            ErrorKind::ProviderReconcile => Some(Duration::from_secs(5)),
            _ => None,
        }
    }
}

/// Specific kinds of domain errors, matching the error-kind/policy table
/// of the trigger-dispatch design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, unknown provider, unknown trigger type.
    Validation,
    /// Invalid/expired JWT, unknown principal.
    Auth,
    /// Row not found (trigger, provider, workflow, webhook path).
    NotFound,
    /// Unique-constraint violation (identity, webhook path, provider alias).
    Conflict,
    /// Provider adapter create/refresh/destroy failed against the external API.
    ProviderReconcile,
    /// Workflow has no ACTIVE deployment at dispatch time.
    NoActiveDeployment,
    /// Runtime invocation failed (connect, timeout, non-2xx from container).
    RuntimeInvocation,
    /// Scheduler dropped a run past its misfire grace period.
    SchedulerMisfire,
    /// Secret/provider-config decryption failed.
    Decryption,
    /// Anything else internal to the service.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation failed"),
            Self::Auth => write!(f, "authentication failed"),
            Self::NotFound => write!(f, "resource not found"),
            Self::Conflict => write!(f, "conflicting resource state"),
            Self::ProviderReconcile => write!(f, "provider reconcile failed"),
            Self::NoActiveDeployment => write!(f, "no active deployment"),
            Self::RuntimeInvocation => write!(f, "runtime invocation failed"),
            Self::SchedulerMisfire => write!(f, "scheduler misfire"),
            Self::Decryption => write!(f, "decryption failed"),
            Self::Internal => write!(f, "internal error"),
        }
    }
}

// Convenience constructors for common error scenarios.
impl Error {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation).with_message(message)
    }

    /// Creates an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth).with_message(message)
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound).with_message(message)
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict).with_message(message)
    }

    /// Creates a provider reconcile error.
    pub fn provider_reconcile(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProviderReconcile).with_message(message)
    }

    /// Creates a no-active-deployment error.
    pub fn no_active_deployment() -> Self {
        Self::new(ErrorKind::NoActiveDeployment)
    }

    /// Creates a runtime invocation error.
    pub fn runtime_invocation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RuntimeInvocation).with_message(message)
    }

    /// Creates a scheduler misfire error.
    pub fn scheduler_misfire(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SchedulerMisfire).with_message(message)
    }

    /// Creates a decryption error.
    pub fn decryption(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decryption).with_message(message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal).with_message(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_vs_server_classification() {
        assert!(Error::validation("bad input").is_client_error());
        assert!(Error::auth("expired").is_client_error());
        assert!(Error::internal("boom").is_server_error());
        assert!(!Error::internal("boom").is_client_error());
    }

    #[test]
    fn retry_policy() {
        let err = Error::runtime_invocation("connect refused");
        assert!(err.is_retryable());
        assert!(err.retry_delay().is_some());

        let err = Error::validation("bad");
        assert!(!err.is_retryable());
        assert!(err.retry_delay().is_none());
    }

    #[test]
    fn display_includes_message() {
        let err = Error::not_found("trigger abc");
        assert_eq!(err.to_string(), "resource not found: trigger abc");
    }
}
