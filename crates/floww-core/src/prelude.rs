//! Commonly used items from floww-core.
//!
//! This prelude module exports the most commonly used types to simplify
//! imports in consuming crates.

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::health::{ServiceHealth, ServiceStatus};
pub use crate::owner::Owner;
pub use crate::timing::Timing;

#[cfg(feature = "encryption")]
pub use crate::crypto::{EncryptionKey, decrypt, decrypt_json, encrypt, encrypt_json};
