//! Namespace ownership.
//!
//! The source models Namespace/Organization/User ownership as a cyclic
//! foreign-key graph. We model it instead as a closed sum type with a
//! check constraint enforced at the data layer (`floww-postgres`), never
//! as a pointer graph.

use uuid::Uuid;

/// The owner of a namespace: exactly one user or one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Owner {
    /// Namespace owned directly by a user.
    User(Uuid),
    /// Namespace owned by an organization.
    Organization(Uuid),
}

impl Owner {
    /// Returns the owning user id, if this is a user-owned namespace.
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::User(id) => Some(*id),
            Self::Organization(_) => None,
        }
    }

    /// Returns the owning organization id, if this is an org-owned namespace.
    pub fn organization_id(&self) -> Option<Uuid> {
        match self {
            Self::Organization(id) => Some(*id),
            Self::User(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_owner_exposes_user_id_only() {
        let id = Uuid::new_v4();
        let owner = Owner::User(id);
        assert_eq!(owner.user_id(), Some(id));
        assert_eq!(owner.organization_id(), None);
    }
}
