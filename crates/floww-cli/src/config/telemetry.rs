//! Telemetry configuration management.
//!
//! Configuration for anonymized usage analytics and crash reporting. This is
//! ambient process plumbing, not part of the trigger-dispatch domain itself.

use clap::Args;
use serde::{Deserialize, Serialize};

/// Telemetry configuration options.
#[derive(Debug, Clone, Serialize, Deserialize, Args)]
pub struct TelemetryConfig {
    /// Whether telemetry is enabled. Disabled collects and sends nothing,
    /// regardless of the other settings.
    #[arg(long, env = "FLOWW_TELEMETRY_ENABLED")]
    #[serde(default)]
    pub enabled: bool,

    /// Custom endpoint for telemetry data. Falls back to the default
    /// telemetry endpoint if unset.
    #[arg(long, env = "FLOWW_TELEMETRY_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Timeout for telemetry requests in seconds. Valid range: 1-300.
    #[arg(long, env = "FLOWW_TELEMETRY_TIMEOUT", default_value_t = 10)]
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Whether to collect usage statistics: startup/shutdown events and
    /// anonymized configuration patterns.
    #[arg(long, env = "FLOWW_TELEMETRY_COLLECT_USAGE")]
    #[serde(default = "default_true")]
    pub collect_usage: bool,

    /// Whether to collect crash reports: sanitized error messages, error
    /// codes, and system information.
    #[arg(long, env = "FLOWW_TELEMETRY_COLLECT_CRASHES")]
    #[serde(default = "default_true")]
    pub collect_crashes: bool,

    /// Maximum number of telemetry events to buffer before dropping them.
    #[arg(long, env = "FLOWW_TELEMETRY_BUFFER_SIZE", default_value_t = 100)]
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Logs telemetry operations at DEBUG level for troubleshooting.
    #[arg(long, env = "FLOWW_TELEMETRY_VERBOSE")]
    #[serde(default)]
    pub verbose: bool,
}

impl TelemetryConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://telemetry.floww.dev/v1/events";

    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            enabled: true,
            endpoint: Some("http://localhost:3000/test".to_string()),
            timeout_seconds: 1,
            collect_usage: true,
            collect_crashes: true,
            buffer_size: 10,
            verbose: true,
        }
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        self.endpoint.as_ref().is_some_and(|e| e.contains("localhost") || e.contains("127.0.0.1") || e.contains("test"))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if !(1..=300).contains(&self.timeout_seconds) {
            return Err(anyhow::anyhow!("telemetry timeout {} seconds is invalid; must be between 1 and 300", self.timeout_seconds));
        }

        if let Some(ref endpoint) = self.endpoint
            && !endpoint.starts_with("http://")
            && !endpoint.starts_with("https://")
        {
            return Err(anyhow::anyhow!("telemetry endpoint '{endpoint}' must start with http:// or https://"));
        }

        if !self.collect_usage && !self.collect_crashes {
            return Err(anyhow::anyhow!("at least one telemetry collection type (usage or crashes) must be enabled"));
        }

        Ok(())
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(Self::DEFAULT_ENDPOINT)
    }
}

impl Default for TelemetryConfig {
    /// Telemetry is disabled by default and must be explicitly opted into.
    fn default() -> Self {
        Self { enabled: false, endpoint: None, timeout_seconds: 10, collect_usage: true, collect_crashes: true, buffer_size: 100, verbose: false }
    }
}

const fn default_timeout() -> u64 {
    10
}

const fn default_true() -> bool {
    true
}

const fn default_buffer_size() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_disabled() {
        let config = TelemetryConfig::default();
        assert!(!config.enabled);
        assert!(config.endpoint.is_none());
        assert_eq!(config.timeout_seconds, 10);
        assert!(config.collect_usage);
        assert!(config.collect_crashes);
        assert!(!config.verbose);
    }

    #[test]
    fn validation_works_correctly() {
        let config = TelemetryConfig::default();
        assert!(config.validate().is_ok());

        let test_config = TelemetryConfig::for_testing();
        assert!(test_config.validate().is_ok());

        let mut invalid_config = TelemetryConfig::for_testing();
        invalid_config.timeout_seconds = 0;
        assert!(invalid_config.validate().is_err());

        invalid_config.timeout_seconds = 10;
        invalid_config.endpoint = Some("invalid-url".to_string());
        assert!(invalid_config.validate().is_err());

        invalid_config.endpoint = None;
        invalid_config.collect_usage = false;
        invalid_config.collect_crashes = false;
        assert!(invalid_config.validate().is_err());
    }
}
