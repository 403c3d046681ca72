//! The V2 invocation payload: the wire format sent to workflow code,
//! identical across every runtime backend.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// The provider a trigger is attached to, as seen by workflow code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerProvider {
    /// Provider type, e.g. `"gitlab"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The provider's namespace-scoped alias.
    pub alias: String,
}

/// The triggering trigger's identity, as seen by workflow code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDescriptor {
    pub provider: TriggerProvider,
    pub trigger_type: String,
    pub input: Value,
}

/// The event that caused this invocation, shaped differently per trigger
/// source but identically named across the three.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, rename_all = "camelCase")]
pub enum EventData {
    /// Raw inbound HTTP request data, for webhook-driven triggers.
    Webhook {
        method: String,
        path: String,
        headers: Value,
        body: Value,
        query: Value,
        params: Value,
    },
    /// Cron tick data, for scheduler-driven triggers.
    Cron { scheduled_time: String, expression: String },
    /// Data for a user-initiated manual invocation.
    Manual {
        manually_triggered: bool,
        triggered_by: String,
        input_data: Value,
    },
}

/// The full invocation payload handed to a runtime backend's `invoke_trigger`.
///
/// Identical shape regardless of which backend ultimately receives it; only
/// the transport differs (container `/execute` POST, function enqueue).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V2Payload {
    pub trigger: TriggerDescriptor,
    pub data: EventData,
    pub backend_url: Url,
    pub auth_token: String,
    pub execution_id: String,
    /// `"<type>:<alias>"` -> decrypted provider config.
    pub provider_configs: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let payload = V2Payload {
            trigger: TriggerDescriptor {
                provider: TriggerProvider { kind: "gitlab".to_string(), alias: "main".to_string() },
                trigger_type: "onMergeRequestComment".to_string(),
                input: serde_json::json!({ "projectId": "42" }),
            },
            data: EventData::Cron { scheduled_time: "2026-01-01T00:00:00Z".to_string(), expression: "0 * * * * *".to_string() },
            backend_url: "https://api.floww.dev".parse().unwrap(),
            auth_token: "token".to_string(),
            execution_id: "exec-1".to_string(),
            provider_configs: HashMap::new(),
        };

        let encoded = serde_json::to_string(&payload).unwrap();
        let decoded: V2Payload = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.trigger.trigger_type, "onMergeRequestComment");
        assert_eq!(decoded.data, payload.data);
    }

    #[test]
    fn cron_event_data_is_serialized_as_camel_case() {
        let data = EventData::Cron { scheduled_time: "2026-01-01T00:00:00Z".to_string(), expression: "*/10 * * * *".to_string() };
        let encoded = serde_json::to_value(&data).unwrap();
        assert_eq!(encoded["scheduledTime"], "2026-01-01T00:00:00Z");
        assert_eq!(encoded["expression"], "*/10 * * * *");
        assert!(encoded.get("scheduled_time").is_none());
    }

    #[test]
    fn trigger_type_is_serialized_under_the_type_key() {
        let provider = TriggerProvider { kind: "slack".to_string(), alias: "team".to_string() };
        let encoded = serde_json::to_value(&provider).unwrap();
        assert_eq!(encoded["type"], "slack");
    }
}
