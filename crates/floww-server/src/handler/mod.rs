//! All axum [`Router`]s with their related handlers.
//!
//! [`Router`]: axum::routing::Router

mod executions;
mod monitors;
pub mod response;
mod sync;
mod triggers;
mod webhook;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

use crate::error::{Error, ErrorKind};
use crate::service::ServiceState;

#[inline]
async fn not_found() -> Response {
    Error::new(ErrorKind::NotFound).into_response()
}

/// Returns an [`ApiRouter`] with every route the core exposes: event
/// ingress, execution reporting, manual invoke, and declarative trigger
/// reconcile.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(webhook::routes())
        .merge(executions::routes())
        .merge(triggers::routes())
        .merge(sync::routes())
        .merge(monitors::routes())
        .fallback(not_found)
}

#[cfg(test)]
mod test {
    use aide::openapi::OpenApi;
    use axum_test::TestServer;

    use super::*;

    /// Builds a [`TestServer`] around the full route table for a given
    /// [`ServiceState`].
    pub fn create_test_server(state: ServiceState) -> TestServer {
        let mut api = OpenApi::default();
        let router = routes().with_state(state).finish_api(&mut api);
        TestServer::new(router).expect("test server construction cannot fail")
    }
}
