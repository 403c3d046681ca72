#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

#[cfg(feature = "encryption")]
#[cfg_attr(docsrs, doc(cfg(feature = "encryption")))]
pub mod crypto;

pub mod error;
pub mod health;
pub mod owner;
pub mod quota;
pub mod timing;

#[doc(hidden)]
pub mod prelude;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use health::{ServiceHealth, ServiceStatus};
pub use owner::Owner;
pub use quota::{PermissiveQuotaCheck, QuotaCheck};
pub use timing::Timing;
