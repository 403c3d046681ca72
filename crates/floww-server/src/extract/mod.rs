//! Request extractors beyond axum's built-ins.

mod connection_info;
mod workflow_claims;

pub use connection_info::{AppConnectInfo, ClientIp};
pub use workflow_claims::VerifiedWorkflowClaims;
