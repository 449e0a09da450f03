use serde::{Deserialize, Serialize};

/// One application-level event emitted by the producer.
///
/// The producer always writes exactly `{"message": "..."}` and strict
/// decoding rejects anything else. Readers that only display a stream use
/// [`message_of`] instead, which tolerates extra fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamRecord {
    pub message: String,
}

impl StreamRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The `message` text of a parsed JSON line, if it carries one.
///
/// Any JSON object with a string `message` field counts as a record here;
/// other fields are ignored.
pub fn message_of(value: &serde_json::Value) -> Option<&str> {
    value.get("message").and_then(serde_json::Value::as_str)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_to_single_message_object() {
        let json = serde_json::to_string(&StreamRecord::new("one")).unwrap();
        assert_eq!(json, r#"{"message":"one"}"#);
    }

    #[test]
    fn rejects_extra_fields() {
        let result = serde_json::from_str::<StreamRecord>(r#"{"message":"a","extra":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_message() {
        let result = serde_json::from_str::<StreamRecord>(r#"{"text":"a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn message_of_ignores_extra_fields() {
        let value = json!({ "message": "one", "seq": 1 });
        assert_eq!(message_of(&value), Some("one"));
    }

    #[test]
    fn message_of_requires_a_string_message() {
        assert_eq!(message_of(&json!({ "message": 1 })), None);
        assert_eq!(message_of(&json!({ "text": "one" })), None);
        assert_eq!(message_of(&json!(["message"])), None);
    }
}
