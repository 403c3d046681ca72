//! HTTP middleware configuration: CORS, security headers, and recovery.
//!
//! Re-exports the config types `floww-server` itself defines (already
//! `clap::Args`-derivable behind its `config` feature), adding the one
//! tunable that's CLI-only: the request body size limit.
//!
//! # Example
//!
//! ```bash
//! floww --cors-origins "https://example.com" --request-timeout 60
//! ```

use clap::Args;
use floww_server::middleware::{CorsConfig, DEFAULT_MAX_BODY_SIZE, RecoveryConfig, SecurityHeadersConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Response security headers (HSTS, CSP, frame options, referrer policy).
    #[clap(flatten)]
    pub security_headers: SecurityHeadersConfig,

    /// Request timeout / panic recovery configuration.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Maximum accepted request body size, in bytes.
    #[arg(long = "max-body-size", env = "MAX_BODY_SIZE", default_value_t = DEFAULT_MAX_BODY_SIZE)]
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}
