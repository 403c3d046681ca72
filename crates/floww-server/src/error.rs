//! HTTP-facing error type.
//!
//! Every handler returns `Result<T, Error>`. `Error` carries an internal
//! [`ErrorKind`], an optional client-safe message, an optional resource
//! name, and optional internal context that never reaches the client.

use std::borrow::Cow;

use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// An HTTP-facing error, convertible from `floww_core::Error` and from the
/// other crates' local error types via the `?` operator.
#[derive(Debug, Default, Clone)]
#[must_use = "errors do nothing unless returned from a handler"]
pub struct Error<'a> {
    kind: ErrorKind,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    context: Option<Cow<'a, str>>,
}

/// The taxonomy of HTTP-facing error conditions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingPathParam,
    BadRequest,
    MissingAuthToken,
    MalformedAuthToken,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    TooManyRequests,
    #[default]
    InternalServerError,
    NotImplemented,
}

impl<'a> Error<'a> {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, message: None, resource: None, context: None }
    }

    pub fn missing_path_param() -> Self {
        Self::new(ErrorKind::MissingPathParam)
    }

    pub fn bad_request() -> Self {
        Self::new(ErrorKind::BadRequest)
    }

    pub fn missing_auth_token() -> Self {
        Self::new(ErrorKind::MissingAuthToken)
    }

    pub fn malformed_auth_token() -> Self {
        Self::new(ErrorKind::MalformedAuthToken)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized)
    }

    pub fn forbidden() -> Self {
        Self::new(ErrorKind::Forbidden)
    }

    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    pub fn conflict() -> Self {
        Self::new(ErrorKind::Conflict)
    }

    pub fn too_many_requests() -> Self {
        Self::new(ErrorKind::TooManyRequests)
    }

    pub fn internal() -> Self {
        Self::new(ErrorKind::InternalServerError)
    }

    pub fn not_implemented() -> Self {
        Self::new(ErrorKind::NotImplemented)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl std::fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl<'a> From<Error<'a>> for ErrorResponse<'a> {
    fn from(error: Error<'a>) -> Self {
        let base = match error.kind {
            ErrorKind::MissingPathParam => ErrorResponse::BAD_REQUEST.with_message("A required path parameter was missing"),
            ErrorKind::BadRequest => ErrorResponse::BAD_REQUEST,
            ErrorKind::MissingAuthToken => ErrorResponse::MISSING_AUTH_TOKEN,
            ErrorKind::MalformedAuthToken => ErrorResponse::MALFORMED_AUTH_TOKEN,
            ErrorKind::Unauthorized => ErrorResponse::UNAUTHORIZED,
            ErrorKind::Forbidden => ErrorResponse::FORBIDDEN,
            ErrorKind::NotFound => ErrorResponse::NOT_FOUND,
            ErrorKind::Conflict => ErrorResponse::CONFLICT,
            ErrorKind::TooManyRequests => ErrorResponse::TOO_MANY_REQUESTS,
            ErrorKind::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
            ErrorKind::NotImplemented => ErrorResponse::new("not_implemented", "This capability is not implemented", axum::http::StatusCode::NOT_IMPLEMENTED),
        };
        let mut response = base;
        if let Some(message) = error.message {
            response = response.with_message(message);
        }
        if let Some(resource) = error.resource {
            response = response.with_resource(resource);
        }
        if let Some(context) = error.context {
            response = response.with_context(context);
        }
        response
    }
}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        if matches!(self.kind, ErrorKind::InternalServerError) {
            tracing::error!(context = self.context.as_deref(), message = self.message.as_deref(), "internal server error");
        }
        ErrorResponse::from(self).into_response()
    }
}

/// Bridges a domain error from any of the lower crates into the HTTP
/// surface, following the policy table: validation and decryption
/// failures are client/server 4xx/5xx respectively, while reconcile,
/// runtime-invocation and scheduler-misfire failures are never meant to
/// reach a handler's `?` in the first place (they're isolated or logged
/// at their call site) — if one does, it's treated as internal.
impl From<floww_core::Error> for Error<'_> {
    fn from(error: floww_core::Error) -> Self {
        use floww_core::ErrorKind as CoreKind;
        let kind = match error.kind {
            CoreKind::Validation => ErrorKind::BadRequest,
            CoreKind::Auth => ErrorKind::Unauthorized,
            CoreKind::NotFound => ErrorKind::NotFound,
            CoreKind::Conflict => ErrorKind::Conflict,
            CoreKind::NoActiveDeployment => ErrorKind::NotFound,
            CoreKind::ProviderReconcile
            | CoreKind::RuntimeInvocation
            | CoreKind::SchedulerMisfire
            | CoreKind::Decryption
            | CoreKind::Internal => ErrorKind::InternalServerError,
        };
        Error::new(kind).with_context(error.to_string())
    }
}

impl From<floww_postgres::PgError> for Error<'_> {
    fn from(error: floww_postgres::PgError) -> Self {
        Error::internal().with_context(error.to_string())
    }
}

impl From<floww_providers::ProviderError> for Error<'_> {
    fn from(error: floww_providers::ProviderError) -> Self {
        use floww_providers::ProviderError as ProvKind;
        let kind = match error {
            ProvKind::InvalidInput { .. } | ProvKind::ProviderNotFound { .. } => ErrorKind::BadRequest,
            ProvKind::Delivery(_) | ProvKind::Database(_) | ProvKind::Serialization(_) | ProvKind::Decryption(_) | ProvKind::Unsupported { .. } | ProvKind::Internal(_) => {
                ErrorKind::InternalServerError
            }
        };
        Error::new(kind).with_context(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = ErrorResponse::from(Error::not_found().with_resource("trigger"));
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.resource.as_deref(), Some("trigger"));
    }

    #[test]
    fn core_no_active_deployment_maps_to_not_found() {
        let core = floww_core::Error::no_active_deployment();
        let error: Error<'_> = core.into();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn default_kind_is_internal_server_error() {
        assert_eq!(Error::default().kind(), ErrorKind::InternalServerError);
    }
}
