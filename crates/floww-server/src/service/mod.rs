//! Application configuration, state, and the workflow invocation JWT.

mod config;
pub mod jwt;
pub mod state;

pub use config::{DispatchConfig, SchedulerStoreConfig, ServiceConfig};
pub use jwt::{WorkflowClaims, WorkflowJwt};
pub use state::ServiceState;
