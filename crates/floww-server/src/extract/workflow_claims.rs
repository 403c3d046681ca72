//! Extracts and verifies a workflow invocation bearer token.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::error::Error;
use crate::service::{WorkflowClaims, WorkflowJwt};

/// Verified claims from the `Authorization: Bearer <token>` header on an
/// execution-reporting callback.
#[derive(Debug, Clone)]
pub struct VerifiedWorkflowClaims(pub WorkflowClaims);

impl<S> FromRequestParts<S> for VerifiedWorkflowClaims
where
    S: Send + Sync,
    WorkflowJwt: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| Error::missing_auth_token())?;

        let jwt = WorkflowJwt::from_ref(state);
        let claims = jwt.verify(bearer.token()).map_err(|_| Error::malformed_auth_token())?;

        Ok(Self(claims))
    }
}
