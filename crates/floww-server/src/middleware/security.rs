//! CORS, security headers, and request body size limits.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;

/// Maximum accepted request body size: large enough for a webhook payload
/// with a generous attachment, small enough to bound memory use.
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// Comma-delimited list of allowed origins. Falls back to a handful of
    /// localhost dev origins when unset.
    #[cfg_attr(feature = "config", arg(long, env = "CORS_ORIGINS", value_delimiter = ','))]
    pub allowed_origins: Vec<String>,

    #[cfg_attr(feature = "config", arg(long, env = "CORS_MAX_AGE", default_value = "3600"))]
    pub max_age_seconds: u64,

    #[cfg_attr(feature = "config", arg(long, env = "CORS_ALLOW_CREDENTIALS", default_value = "true"))]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: Vec::new(), max_age_seconds: 3600, allow_credentials: true }
    }
}

fn dev_origins() -> Vec<HeaderValue> {
    [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
        "http://localhost:8080",
    ]
    .into_iter()
    .filter_map(|origin| HeaderValue::from_str(origin).ok())
    .collect()
}

pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = if config.allowed_origins.is_empty() {
        dev_origins()
    } else {
        config.allowed_origins.iter().filter_map(|origin| HeaderValue::from_str(origin).ok()).collect()
    };

    let mut layer = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(config.max_age_seconds));

    if config.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    layer
}

/// Clickjacking protection for the `X-Frame-Options` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
pub enum FrameOptions {
    #[default]
    Deny,
    SameOrigin,
}

impl FrameOptions {
    fn as_header_value(self) -> HeaderValue {
        match self {
            Self::Deny => HeaderValue::from_static("DENY"),
            Self::SameOrigin => HeaderValue::from_static("SAMEORIGIN"),
        }
    }
}

/// `Referrer-Policy` header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
pub enum ReferrerPolicy {
    NoReferrer,
    Origin,
    #[default]
    StrictOriginWhenCrossOrigin,
    SameOrigin,
}

impl ReferrerPolicy {
    fn as_header_value(self) -> HeaderValue {
        match self {
            Self::NoReferrer => HeaderValue::from_static("no-referrer"),
            Self::Origin => HeaderValue::from_static("origin"),
            Self::StrictOriginWhenCrossOrigin => HeaderValue::from_static("strict-origin-when-cross-origin"),
            Self::SameOrigin => HeaderValue::from_static("same-origin"),
        }
    }
}

const DEFAULT_CSP: &str = "default-src 'none'; frame-ancestors 'none'";

/// Response security headers, applied to every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct SecurityHeadersConfig {
    #[cfg_attr(feature = "config", arg(long, env = "HSTS_MAX_AGE", default_value = "31536000"))]
    pub hsts_max_age_seconds: u64,

    #[cfg_attr(feature = "config", arg(long, env = "HSTS_INCLUDE_SUBDOMAINS", default_value = "true"))]
    pub hsts_include_subdomains: bool,

    #[cfg_attr(feature = "config", arg(long, env = "CONTENT_SECURITY_POLICY", default_value = DEFAULT_CSP))]
    pub content_security_policy: String,

    #[cfg_attr(feature = "config", arg(long, env = "FRAME_OPTIONS", value_enum, default_value_t = FrameOptions::Deny))]
    pub frame_options: FrameOptions,

    #[cfg_attr(feature = "config", arg(long, env = "REFERRER_POLICY", value_enum, default_value_t = ReferrerPolicy::StrictOriginWhenCrossOrigin))]
    pub referrer_policy: ReferrerPolicy,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            hsts_max_age_seconds: 31_536_000,
            hsts_include_subdomains: true,
            content_security_policy: DEFAULT_CSP.to_string(),
            frame_options: FrameOptions::Deny,
            referrer_policy: ReferrerPolicy::StrictOriginWhenCrossOrigin,
        }
    }
}

impl SecurityHeadersConfig {
    fn hsts_value(&self) -> HeaderValue {
        let value = if self.hsts_include_subdomains {
            format!("max-age={}; includeSubDomains", self.hsts_max_age_seconds)
        } else {
            format!("max-age={}", self.hsts_max_age_seconds)
        };
        HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("max-age=31536000"))
    }

    fn csp_value(&self) -> HeaderValue {
        HeaderValue::from_str(&self.content_security_policy).unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CSP))
    }
}

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    fn with_security(self, cors: &CorsConfig, headers: &SecurityHeadersConfig, max_body_size: usize) -> Self;
    fn with_default_security(self) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig, headers: &SecurityHeadersConfig, max_body_size: usize) -> Self {
        self.layer(RequestBodyLimitLayer::new(max_body_size))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("referrer-policy"),
                headers.referrer_policy.as_header_value(),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-frame-options"),
                headers.frame_options.as_header_value(),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(HeaderName::from_static("content-security-policy"), headers.csp_value()))
            .layer(SetResponseHeaderLayer::if_not_present(HeaderName::from_static("strict-transport-security"), headers.hsts_value()))
            .layer(create_cors_layer(cors))
    }

    fn with_default_security(self) -> Self {
        self.with_security(&CorsConfig::default(), &SecurityHeadersConfig::default(), DEFAULT_MAX_BODY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_origins_fallback_is_used_when_unconfigured() {
        let layer = create_cors_layer(&CorsConfig::default());
        let _ = layer;
    }

    #[test]
    fn hsts_value_includes_subdomains_by_default() {
        let config = SecurityHeadersConfig::default();
        let value = config.hsts_value();
        assert!(value.to_str().unwrap().contains("includeSubDomains"));
    }

    #[test]
    fn frame_options_deny_maps_to_deny_header() {
        assert_eq!(FrameOptions::Deny.as_header_value(), HeaderValue::from_static("DENY"));
    }
}
