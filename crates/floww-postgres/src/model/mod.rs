//! Database models for the floww data model.

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

pub use execution_history::{
    ExecutionHistory, MarkExecutionFinished, MarkExecutionStarted, NewExecutionHistory,
};
pub use incoming_webhook::{IncomingWebhook, NewIncomingWebhook};
pub use namespace::{NewNamespace, Namespace, UpdateNamespace};
pub use organization::{NewOrganization, Organization, UpdateOrganization};
pub use organization_member::{NewOrganizationMember, OrganizationMember, UpdateOrganizationMember};
pub use provider::{NewProvider, Provider, UpdateProvider};
pub use recurring_task::{NewRecurringTask, RecurringTask};
pub use runtime::{config_hash, NewRuntime, Runtime, UpdateRuntime};
pub use secret::{NewSecret, Secret, UpdateSecret};
pub use trigger::{canonical_json, NewTrigger, Trigger, UpdateTriggerState};
pub use user::{NewUser, UpdateUser, User};
pub use workflow::{NewWorkflow, UpdateWorkflow, Workflow};
pub use workflow_deployment::{
    NewWorkflowDeployment, UpdateWorkflowDeploymentStatus, WorkflowDeployment,
};
