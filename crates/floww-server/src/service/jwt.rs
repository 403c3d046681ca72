//! Workflow invocation JWT: minted by the dispatcher, verified by the
//! `/api/executions/{id}/{complete,fail}` callbacks so only the runtime a
//! deployment was dispatched to can report its own outcome.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const AUDIENCE: &str = "floww-workflow";
const ISSUER: &str = "floww-backend";

/// Claims embedded in a workflow invocation token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowClaims {
    /// `deployment:<deployment_id>`.
    pub sub: String,
    pub deployment_id: Uuid,
    pub workflow_id: Uuid,
    pub namespace_id: Uuid,
    pub invocation_id: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
    pub iss: String,
}

/// Mints and verifies [`WorkflowClaims`] tokens.
#[derive(Clone)]
pub struct WorkflowJwt {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration: std::time::Duration,
}

impl WorkflowJwt {
    pub fn new(secret: &str, expiration: std::time::Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration,
        }
    }

    /// Mints a fresh token for a single invocation of `deployment_id`.
    pub fn mint(&self, deployment_id: Uuid, workflow_id: Uuid, namespace_id: Uuid) -> Result<(String, Uuid), jsonwebtoken::errors::Error> {
        let now = jiff::Timestamp::now();
        let expires_at = now
            .checked_add(jiff::Span::new().seconds(self.expiration.as_secs() as i64))
            .unwrap_or(now);
        let invocation_id = Uuid::now_v7();
        let claims = WorkflowClaims {
            sub: format!("deployment:{deployment_id}"),
            deployment_id,
            workflow_id,
            namespace_id,
            invocation_id,
            iat: now.as_second(),
            exp: expires_at.as_second(),
            aud: AUDIENCE.to_string(),
            iss: ISSUER.to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, invocation_id))
    }

    /// Verifies a bearer token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<WorkflowClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUDIENCE]);
        validation.set_issuer(&[ISSUER]);

        let data = decode::<WorkflowClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> WorkflowJwt {
        WorkflowJwt::new("test-secret", std::time::Duration::from_secs(300))
    }

    #[test]
    fn mint_then_verify_round_trips_claims() {
        let jwt = jwt();
        let deployment_id = Uuid::now_v7();
        let workflow_id = Uuid::now_v7();
        let namespace_id = Uuid::now_v7();

        let (token, invocation_id) = jwt.mint(deployment_id, workflow_id, namespace_id).unwrap();
        let claims = jwt.verify(&token).unwrap();

        assert_eq!(claims.deployment_id, deployment_id);
        assert_eq!(claims.invocation_id, invocation_id);
        assert_eq!(claims.sub, format!("deployment:{deployment_id}"));
    }

    #[test]
    fn verify_rejects_token_signed_with_a_different_secret() {
        let (token, _) = jwt().mint(Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7()).unwrap();
        let other = WorkflowJwt::new("other-secret", std::time::Duration::from_secs(300));
        assert!(other.verify(&token).is_err());
    }
}
