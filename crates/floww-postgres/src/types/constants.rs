//! Constants used throughout the application.

/// Default number of records returned per offset-paginated page.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Maximum number of records returned per offset-paginated page.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Default grace period, in seconds, after which a missed scheduler fire is
/// dropped instead of run late.
pub const MISFIRE_GRACE_SECONDS: i64 = 30;
