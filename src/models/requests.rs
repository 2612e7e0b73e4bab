//! Request DTOs for the operator API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::invalidation::EventPayload;

/// Request body for `POST /invalidate`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidateRequest {
    /// Domain event name, e.g. `inventory.updated`
    pub event_type: String,
    /// Optional event scope
    #[serde(default)]
    pub payload: EventPayload,
}

impl InvalidateRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.event_type.trim().is_empty() {
            return Some("eventType cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidate_request_deserialize() {
        let json = r#"{"eventType": "inventory.updated", "payload": {"entityId": "item-1"}}"#;
        let req: InvalidateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.event_type, "inventory.updated");
        assert_eq!(req.payload.entity_id.as_deref(), Some("item-1"));
    }

    #[test]
    fn test_payload_is_optional() {
        let req: InvalidateRequest =
            serde_json::from_str(r#"{"eventType": "supplier.created"}"#).unwrap();
        assert_eq!(req.payload, EventPayload::default());
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_empty_event_type() {
        let req = InvalidateRequest {
            event_type: " ".to_string(),
            payload: EventPayload::default(),
        };
        assert!(req.validate().is_some());
    }
}
