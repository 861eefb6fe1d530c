use bytes::Bytes;
use serde_json::{Map, Value};

use crate::content_types;

/// `Payload` is whatever a handler wants written as the response body. How it
/// ends up on the wire is decided by the response's content-type key, see
/// [`PayloadStrategy`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
    Binary(Bytes),
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(String::from(value))
    }
}

impl From<Bytes> for Payload {
    fn from(value: Bytes) -> Self {
        Self::Binary(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(value))
    }
}

/// `PayloadStrategy` selects how a payload gets serialized for a given
/// content-type key. Only `json` and `html` have dedicated strategies, every
/// other key goes through [`PayloadStrategy::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadStrategy {
    Json,
    Html,
    Default,
}

impl PayloadStrategy {
    #[must_use]
    pub fn from_key(content_type: &str) -> Self {
        match content_type {
            content_types::JSON => Self::Json,
            content_types::HTML => Self::Html,
            _ => Self::Default,
        }
    }

    #[must_use]
    pub fn serialize(self, payload: Option<Payload>) -> Bytes {
        match self {
            Self::Json => serialize_json(payload),
            Self::Html => serialize_html(payload),
            Self::Default => serialize_default(payload),
        }
    }
}

// Binary payloads are already serialized and pass through as is. Objects,
// arrays and null count as object-like; anything else becomes `{}`.
fn serialize_json(payload: Option<Payload>) -> Bytes {
    let value = match payload {
        Some(Payload::Binary(data)) => return data,
        Some(Payload::Json(value @ (Value::Object(_) | Value::Array(_) | Value::Null))) => value,
        _ => Value::Object(Map::new()),
    };
    Bytes::from(value.to_string())
}

fn serialize_html(payload: Option<Payload>) -> Bytes {
    match payload {
        Some(Payload::Binary(data)) => data,
        Some(Payload::Text(text) | Payload::Json(Value::String(text))) => Bytes::from(text),
        _ => Bytes::new(),
    }
}

fn serialize_default(payload: Option<Payload>) -> Bytes {
    match payload {
        None => Bytes::new(),
        Some(Payload::Binary(data)) => data,
        Some(Payload::Text(text) | Payload::Json(Value::String(text))) => Bytes::from(text),
        Some(Payload::Json(value)) => Bytes::from(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strategy_from_key() {
        assert_eq!(PayloadStrategy::from_key("json"), PayloadStrategy::Json);
        assert_eq!(PayloadStrategy::from_key("html"), PayloadStrategy::Html);
        assert_eq!(PayloadStrategy::from_key("css"), PayloadStrategy::Default);
        assert_eq!(PayloadStrategy::from_key("JSON"), PayloadStrategy::Default);
    }

    #[test]
    fn test_json_strategy_keeps_object_like_values() {
        let strategy = PayloadStrategy::Json;
        assert_eq!(strategy.serialize(Some(json!([1, 2]).into())), "[1,2]");
        assert_eq!(strategy.serialize(Some(Value::Null.into())), "null");
        assert_eq!(strategy.serialize(Some(json!(42).into())), "{}");
        assert_eq!(strategy.serialize(Some("text".into())), "{}");
        assert_eq!(strategy.serialize(None), "{}");
    }

    #[test]
    fn test_binary_payload_is_written_unchanged_by_every_strategy() {
        let file = Bytes::from_static(br#"{"items":[1,2]}"#);
        for strategy in [PayloadStrategy::Json, PayloadStrategy::Html, PayloadStrategy::Default] {
            assert_eq!(strategy.serialize(Some(file.clone().into())), file, "{strategy:?}");
        }

        let page = Bytes::from_static(b"<p>static</p>");
        assert_eq!(PayloadStrategy::Html.serialize(Some(page.clone().into())), page);
        assert_eq!(PayloadStrategy::Html.serialize(Some(json!(42).into())), "");
    }

    #[test]
    fn test_default_strategy_passes_payload_through() {
        let strategy = PayloadStrategy::Default;
        let image = Bytes::from_static(&[0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(strategy.serialize(Some(image.clone().into())), image);
        assert_eq!(strategy.serialize(Some(json!("body{}").into())), "body{}");
        assert_eq!(strategy.serialize(Some(json!({"a": true}).into())), r#"{"a":true}"#);
        assert_eq!(strategy.serialize(None), "");
    }
}
