//! Firestore document resource

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::decode_fields;
use crate::{DocStoreError, Result};

/// A document as returned by the REST API, fields still in typed encoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name, `projects/{p}/databases/{d}/documents/{collection}/{id}`
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
}

impl Document {
    /// Last path segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    /// Fields as plain JSON.
    pub fn to_json(&self) -> Result<Map<String, Value>> {
        decode_fields(&self.fields)
    }

    /// Decode the document into `T`. When the document carries no `id` field,
    /// the id from the resource name is supplied.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut data = self.to_json()?;
        data.entry("id")
            .or_insert_with(|| Value::String(self.id().to_string()));

        serde_json::from_value(Value::Object(data))
            .map_err(|e| DocStoreError::decode(format!("document {}: {}", self.name, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Note {
        id: String,
        text: String,
    }

    fn doc(fields: Value) -> Document {
        Document {
            name: "projects/demo-project/databases/(default)/documents/notes/n1".to_string(),
            fields: fields.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    #[test]
    fn test_id_from_name() {
        assert_eq!(doc(json!({})).id(), "n1");
    }

    #[test]
    fn test_decode_supplies_missing_id() {
        let note: Note = doc(json!({"text": {"stringValue": "hi"}})).decode().unwrap();
        assert_eq!(note.id, "n1");
        assert_eq!(note.text, "hi");
    }

    #[test]
    fn test_decode_keeps_stored_id() {
        let note: Note = doc(json!({
            "id": {"stringValue": "stored"},
            "text": {"stringValue": "hi"}
        }))
        .decode()
        .unwrap();
        assert_eq!(note.id, "stored");
    }

    #[test]
    fn test_decode_type_mismatch() {
        let result: Result<Note> = doc(json!({"text": {"integerValue": "1"}})).decode();
        assert!(matches!(result, Err(DocStoreError::Decode(_))));
    }
}
