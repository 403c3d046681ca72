//! Error types for provider reconcile and matching operations.

use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur during provider reconcile or webhook matching.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The trigger's `input` does not conform to the adapter's expected shape.
    #[error("invalid input for trigger_type '{trigger_type}': {message}")]
    InvalidInput {
        /// The trigger type whose input failed validation.
        trigger_type: String,
        /// Description of the violation.
        message: String,
    },

    /// A provider of this kind was referenced but does not exist, and has setup steps.
    #[error("provider '{provider_type}:{alias}' not found and cannot be auto-created")]
    ProviderNotFound {
        /// The missing provider's type.
        provider_type: floww_postgres::types::ProviderKind,
        /// The missing provider's alias.
        alias: String,
    },

    /// A call to a third-party provider API failed.
    #[error("provider API call failed: {0}")]
    Delivery(#[from] floww_webhook::Error),

    /// A database operation failed.
    #[error("database error: {0}")]
    Database(#[from] floww_postgres::PgError),

    /// (De)serialization of provider-native payloads failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Decrypting a provider's `encrypted_config` failed.
    #[error("failed to decrypt provider config: {0}")]
    Decryption(floww_core::crypto::CryptoError),

    /// Operation not supported by this adapter.
    #[error("operation '{operation}' not supported by provider '{provider}'")]
    Unsupported {
        /// The provider kind.
        provider: &'static str,
        /// The unsupported operation name.
        operation: &'static str,
    },

    /// Catch-all for conditions not covered by a more specific variant.
    #[error("internal error: {0}")]
    Internal(String),
}

/// One failed `create` within a [`crate::lifecycle::sync`] call; collected
/// rather than aborting the whole sync (spec: failure-isolated per trigger).
#[derive(Debug, Clone)]
pub struct TriggerSyncFailure {
    /// The logical identity of the trigger that failed to create.
    pub trigger_type: String,
    /// Why the create failed.
    pub error: String,
}
