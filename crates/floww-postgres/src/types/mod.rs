//! Contains constraints, enumerations and other custom types.

mod constants;
mod constraint;
mod enums;
mod pagination;
mod utilities;

pub use constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MISFIRE_GRACE_SECONDS};
pub use constraint::{
    ConstraintCategory, ConstraintViolation, IncomingWebhookConstraints, NamespaceConstraints,
    ProviderConstraints, RuntimeConstraints, SecretConstraints, TriggerConstraints,
    UserConstraints, WorkflowConstraints,
};
pub use enums::{
    DeploymentStatus, ExecutionStatus, OrganizationRole, ProviderKind, RuntimeStatus,
};
pub use pagination::{Cursor, CursorPage, CursorPagination, OffsetPage, OffsetPagination};
pub use utilities::{HasCreatedAt, HasDeletedAt, HasUpdatedAt};
