//! Request IDs and structured tracing.

use axum::Router;
use axum::http::header;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Default request ID generator: a fresh UUID v4 per request.
pub type DefaultRequestIdMaker = MakeRequestUuid;

pub fn create_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(header::HeaderName::from_static(REQUEST_ID_HEADER), MakeRequestUuid)
}

pub fn create_propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(header::HeaderName::from_static(REQUEST_ID_HEADER))
}

pub fn create_sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new([header::AUTHORIZATION, header::COOKIE])
}

pub fn create_trace_layer()
-> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        self.layer(create_sensitive_headers_layer())
            .layer(create_propagate_request_id_layer())
            .layer(create_trace_layer())
            .layer(create_request_id_layer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_constructors_do_not_panic() {
        let _ = create_request_id_layer();
        let _ = create_propagate_request_id_layer();
        let _ = create_sensitive_headers_layer();
        let _ = create_trace_layer();
    }
}
