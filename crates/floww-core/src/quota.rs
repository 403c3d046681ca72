//! Execution quota enforcement, checked before a trigger fire is recorded.
//!
//! Self-hosted deployments have no quota; a managed/cloud deployment can
//! plug in an implementation backed by its billing system. The check runs
//! once per dispatch, ahead of creating the `ExecutionHistory` row, so an
//! organization over its limit produces no row and no runtime invocation.

use uuid::Uuid;

/// Whether an organization may record another execution right now.
#[async_trait::async_trait]
pub trait QuotaCheck: Send + Sync {
    /// Returns `true` if `organization_id` is within its execution quota.
    async fn check(&self, organization_id: Uuid) -> bool;
}

/// The default for self-hosted deployments: no quota is enforced.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveQuotaCheck;

#[async_trait::async_trait]
impl QuotaCheck for PermissiveQuotaCheck {
    async fn check(&self, _organization_id: Uuid) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn permissive_quota_check_always_allows() {
        let check = PermissiveQuotaCheck;
        assert!(check.check(Uuid::now_v7()).await);
    }
}
