//! Database enumeration types for type-safe queries.
//!
//! This module provides strongly-typed enumerations that correspond to PostgreSQL ENUM types
//! defined in the database schema. Each enumeration provides serialization support for APIs
//! and database integration through Diesel.

pub mod deployment_status;
pub mod execution_status;
pub mod organization_role;
pub mod provider_kind;
pub mod runtime_status;

pub use deployment_status::DeploymentStatus;
pub use execution_status::ExecutionStatus;
pub use organization_role::OrganizationRole;
pub use provider_kind::ProviderKind;
pub use runtime_status::RuntimeStatus;
