//! Selects a concrete [`RuntimeBackend`] by configured [`RuntimeKind`].

use strum::{Display, EnumString};

/// Which concrete backend `RUNTIME_TYPE` selects at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum RuntimeKind {
    /// Long-lived warm Docker containers.
    Docker,
    /// A managed function-as-a-service endpoint.
    Lambda,
    /// A pod-orchestrator stub.
    Kubernetes,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn runtime_kind_round_trips_its_env_spelling() {
        assert_eq!(RuntimeKind::from_str("docker").unwrap(), RuntimeKind::Docker);
        assert_eq!(RuntimeKind::from_str("lambda").unwrap(), RuntimeKind::Lambda);
        assert_eq!(RuntimeKind::from_str("kubernetes").unwrap(), RuntimeKind::Kubernetes);
    }
}
