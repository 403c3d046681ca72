//! Utility modules for common functionality across the PostgreSQL models.

mod time_helpers;

pub use time_helpers::*;
