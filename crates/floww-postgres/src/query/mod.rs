//! Database query repositories for all entities in the system.
//!
//! This module contains repository implementations that provide high-level
//! database operations for all entities, encapsulating common patterns
//! and providing type-safe interfaces.
//!
//! # Pagination
//!
//! Queries that may return large result sets use [`crate::types::OffsetPagination`]
//! for consistent, bounded pagination.

mod execution_history;
mod incoming_webhook;
mod namespace;
mod organization;
mod organization_member;
mod provider;
mod recurring_task;
mod runtime;
mod secret;
mod trigger;
mod user;
mod workflow;
mod workflow_deployment;

pub use execution_history::ExecutionHistoryRepository;
pub use incoming_webhook::IncomingWebhookRepository;
pub use namespace::NamespaceRepository;
pub use organization::OrganizationRepository;
pub use organization_member::OrganizationMemberRepository;
pub use provider::ProviderRepository;
pub use recurring_task::RecurringTaskRepository;
pub use runtime::RuntimeRepository;
pub use secret::SecretRepository;
pub use trigger::TriggerRepository;
pub use user::UserRepository;
pub use workflow::WorkflowRepository;
pub use workflow_deployment::WorkflowDeploymentRepository;
