//! Firestore typed value codec
//!
//! The REST API wraps every value in a single-key object naming its type:
//! `{"stringValue": "Tokyo"}`, `{"integerValue": "42"}`,
//! `{"mapValue": {"fields": {...}}}` and so on. Decoding strips the wrappers
//! into plain JSON; encoding adds them back.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

use crate::{DocStoreError, Result};

/// Decode a document's `fields` object into a plain JSON object.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>> {
    fields
        .iter()
        .map(|(key, value)| {
            decode_value(value)
                .map(|decoded| (key.clone(), decoded))
                .map_err(|e| DocStoreError::decode(format!("field '{}': {}", key, e)))
        })
        .collect()
}

/// Decode one typed value into plain JSON.
pub fn decode_value(value: &Value) -> Result<Value> {
    let obj = value
        .as_object()
        .ok_or_else(|| DocStoreError::decode("typed value must be an object"))?;

    let (kind, inner) = match obj.iter().next() {
        Some(entry) if obj.len() == 1 => entry,
        _ => {
            return Err(DocStoreError::decode(format!(
                "typed value must have exactly one key, got {}",
                obj.len()
            )))
        }
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| DocStoreError::decode("booleanValue is not a bool")),
        "integerValue" => decode_integer(inner),
        "doubleValue" => decode_double(inner),
        "timestampValue" | "stringValue" | "bytesValue" | "referenceValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| DocStoreError::decode(format!("{} is not a string", kind))),
        "geoPointValue" => {
            let mut point = Map::new();
            for axis in ["latitude", "longitude"] {
                let coordinate = inner.get(axis).cloned().unwrap_or_else(|| Value::from(0.0));
                point.insert(axis.to_string(), coordinate);
            }
            Ok(Value::Object(point))
        }
        "arrayValue" => match inner.get("values") {
            None => Ok(Value::Array(Vec::new())),
            Some(Value::Array(values)) => values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Some(_) => Err(DocStoreError::decode("arrayValue.values is not an array")),
        },
        "mapValue" => match inner.get("fields") {
            None => Ok(Value::Object(Map::new())),
            Some(Value::Object(fields)) => decode_fields(fields).map(Value::Object),
            Some(_) => Err(DocStoreError::decode("mapValue.fields is not an object")),
        },
        other => Err(DocStoreError::decode(format!("unknown value type '{}'", other))),
    }
}

// int64 travels as a decimal string
fn decode_integer(inner: &Value) -> Result<Value> {
    match inner {
        Value::String(s) => s
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| DocStoreError::decode(format!("integerValue '{}': {}", s, e))),
        Value::Number(n) if n.is_i64() => Ok(Value::Number(n.clone())),
        _ => Err(DocStoreError::decode("integerValue is not an integer")),
    }
}

// NaN and the infinities arrive as strings and have no JSON form
fn decode_double(inner: &Value) -> Result<Value> {
    match inner {
        Value::Number(n) => Ok(Value::Number(n.clone())),
        Value::String(s) if matches!(s.as_str(), "NaN" | "Infinity" | "-Infinity") => Ok(Value::Null),
        _ => Err(DocStoreError::decode("doubleValue is not a number")),
    }
}

/// Encode a plain JSON object as a document's `fields`.
pub fn encode_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

/// Encode plain JSON as a typed value. Strings are always `stringValue`; use
/// [`timestamp_value`] for timestamps.
pub fn encode_value(value: &Value) -> Value {
    let mut wrapped = Map::new();
    match value {
        Value::Null => {
            wrapped.insert("nullValue".into(), Value::Null);
        }
        Value::Bool(b) => {
            wrapped.insert("booleanValue".into(), Value::Bool(*b));
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                wrapped.insert("integerValue".into(), Value::String(i.to_string()));
            } else {
                let f = n.as_f64().unwrap_or_default();
                let number = Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null);
                wrapped.insert("doubleValue".into(), number);
            }
        }
        Value::String(s) => {
            wrapped.insert("stringValue".into(), Value::String(s.clone()));
        }
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            let mut array = Map::new();
            array.insert("values".into(), Value::Array(values));
            wrapped.insert("arrayValue".into(), Value::Object(array));
        }
        Value::Object(fields) => {
            let mut inner = Map::new();
            inner.insert("fields".into(), Value::Object(encode_fields(fields)));
            wrapped.insert("mapValue".into(), Value::Object(inner));
        }
    }
    Value::Object(wrapped)
}

/// Typed `timestampValue` in the RFC 3339 form Firestore expects.
pub fn timestamp_value(ts: &DateTime<Utc>) -> Value {
    let mut wrapped = Map::new();
    wrapped.insert(
        "timestampValue".into(),
        Value::String(ts.to_rfc3339_opts(SecondsFormat::Micros, true)),
    );
    Value::Object(wrapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode_value(&json!({"nullValue": null})).unwrap(), Value::Null);
        assert_eq!(decode_value(&json!({"booleanValue": true})).unwrap(), json!(true));
        assert_eq!(decode_value(&json!({"integerValue": "900"})).unwrap(), json!(900));
        assert_eq!(decode_value(&json!({"doubleValue": 1013.2})).unwrap(), json!(1013.2));
        assert_eq!(decode_value(&json!({"doubleValue": "NaN"})).unwrap(), Value::Null);
        assert_eq!(decode_value(&json!({"stringValue": "Tokyo"})).unwrap(), json!("Tokyo"));
        assert_eq!(
            decode_value(&json!({"timestampValue": "2023-10-01T12:00:00Z"})).unwrap(),
            json!("2023-10-01T12:00:00Z")
        );
    }

    #[test]
    fn test_decode_nested() {
        let typed = json!({
            "mapValue": {"fields": {
                "windSpeed": {"mapValue": {"fields": {
                    "value": {"doubleValue": 25.5},
                    "unit": {"stringValue": "m/s"}
                }}},
                "areas": {"arrayValue": {"values": [
                    {"stringValue": "Chiyoda"},
                    {"stringValue": "Minato"}
                ]}},
                "empty": {"arrayValue": {}},
                "location": {"geoPointValue": {"latitude": 35.6}}
            }}
        });

        let decoded = decode_value(&typed).unwrap();
        assert_eq!(
            decoded,
            json!({
                "windSpeed": {"value": 25.5, "unit": "m/s"},
                "areas": ["Chiyoda", "Minato"],
                "empty": [],
                "location": {"latitude": 35.6, "longitude": 0.0}
            })
        );
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode_value(&json!("bare")).is_err());
        assert!(decode_value(&json!({})).is_err());
        assert!(decode_value(&json!({"integerValue": "12x"})).is_err());
        assert!(decode_value(&json!({"stringValue": "a", "booleanValue": true})).is_err());
        assert!(decode_value(&json!({"vectorValue": {}})).is_err());

        let err = decode_fields(json!({"title": {"stringValue": 3}}).as_object().unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_encode_document_fields() {
        let plain = json!({
            "title": "Fog Warning",
            "rawData": {"pressure": {"value": 1016.0, "unit": "hPa"}, "level": 3},
            "affectedAreas": ["Northern districts"],
            "archived": false
        });

        let encoded = encode_fields(plain.as_object().unwrap());
        assert_eq!(encoded["title"], json!({"stringValue": "Fog Warning"}));
        assert_eq!(encoded["archived"], json!({"booleanValue": false}));
        assert_eq!(
            encoded["affectedAreas"],
            json!({"arrayValue": {"values": [{"stringValue": "Northern districts"}]}})
        );
        assert_eq!(
            encoded["rawData"]["mapValue"]["fields"]["level"],
            json!({"integerValue": "3"})
        );

        // What we write must read back as the same plain document.
        assert_eq!(Value::Object(decode_fields(&encoded).unwrap()), plain);
    }

    #[test]
    fn test_timestamp_value() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            timestamp_value(&ts),
            json!({"timestampValue": "2024-01-02T03:04:05.000000Z"})
        );
    }
}
