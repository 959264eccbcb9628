use serde::{Deserialize, Deserializer, Serialize};

use crate::error::BusError;
use crate::value::{PayloadMap, WireValue};

/// Inbound message as delivered by the dashboard's `externalBus` handler.
///
/// Unknown top-level keys are ignored. A `payload` that is not an object is
/// treated as absent, and an `id` that is not a non-negative integer is
/// dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireMessage {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    pub r#type: String,
    #[serde(default, deserialize_with = "lenient_payload")]
    pub payload: Option<PayloadMap>,
}

impl WireMessage {
    pub fn new(r#type: impl Into<String>, payload: Option<PayloadMap>) -> Self {
        Self {
            id: None,
            r#type: r#type.into(),
            payload,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Parses the raw string posted by the web view.
    pub fn from_json(raw: &str) -> Result<Self, BusError> {
        serde_json::from_str(raw).map_err(BusError::Parse)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, BusError> {
        serde_json::from_value(value).map_err(BusError::Parse)
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<WireValue>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(WireValue::as_f64)
        .filter(|id| *id >= 0.0 && id.fract() == 0.0 && *id <= u64::MAX as f64)
        .map(|id| id as u64))
}

fn lenient_payload<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PayloadMap>, D::Error> {
    match Option::<WireValue>::deserialize(deserializer)? {
        Some(WireValue::Map(map)) => Ok(Some(map)),
        _ => Ok(None),
    }
}

/// Event or command pushed to the dashboard.
#[derive(Debug, Serialize)]
pub struct OutgoingMessage<'a, T> {
    pub id: u64,
    pub r#type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'a str>,
    pub payload: T,
}

/// Response to an inbound request that carried an `id`.
#[derive(Debug, Serialize)]
pub struct ResultMessage<'a> {
    pub id: u64,
    pub r#type: &'static str,
    pub success: bool,
    pub result: &'a serde_json::Value,
}

impl<'a> ResultMessage<'a> {
    pub fn new(id: u64, success: bool, result: &'a serde_json::Value) -> Self {
        Self {
            id,
            r#type: "result",
            success,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_frontend_message() {
        let message = WireMessage::from_json(
            r#"{"id": 4, "type": "haptic", "message": "", "command": "", "payload": {"hapticType": "light"}}"#,
        )
        .unwrap();

        assert_eq!(message.id, Some(4));
        assert_eq!(message.r#type, "haptic");
        let payload = message.payload.unwrap();
        assert_eq!(payload["hapticType"], WireValue::String("light".into()));
    }

    #[test]
    fn payload_and_id_are_optional() {
        let message = WireMessage::from_json(r#"{"type": "config_screen/show"}"#).unwrap();
        assert_eq!(message.id, None);
        assert_eq!(message.payload, None);
    }

    #[test]
    fn non_object_payload_is_treated_as_absent() {
        let message =
            WireMessage::from_value(json!({"id": 1.5, "type": "toast/hide", "payload": "a"}))
                .unwrap();
        assert_eq!(message.id, None);
        assert_eq!(message.payload, None);
    }

    #[test]
    fn missing_type_is_a_parse_error() {
        let err = WireMessage::from_json(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, BusError::Parse(_)));
        assert!(WireMessage::from_json("not json").is_err());
    }

    #[test]
    fn result_message_shape() {
        let result = json!({"success": true});
        let encoded = serde_json::to_value(ResultMessage::new(9, true, &result)).unwrap();
        assert_eq!(
            encoded,
            json!({"id": 9, "type": "result", "success": true, "result": {"success": true}})
        );
    }
}
