//! Typed view over a resource's attribute map
//!
//! The orchestrator hands every operation a loosely typed JSON object. Each
//! resource reads its schema attributes through the accessors here and
//! writes the refreshed state back with [`ResourceData::set`].

use crate::pam::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Attribute holding the identifier in the serialized form
pub const ID_ATTRIBUTE: &str = "id";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, flatten)]
    attributes: Map<String, Value>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            attributes: Map::new(),
        }
    }

    /// Build from a raw JSON object; a top-level `id` becomes the identifier
    pub fn from_value(value: Value) -> ApiResult<Self> {
        let Value::Object(mut attributes) = value else {
            return Err(ApiError::validation("resource state must be a JSON object"));
        };
        let id = match attributes.remove(ID_ATTRIBUTE) {
            Some(Value::String(id)) if !id.is_empty() => Some(id),
            Some(Value::Null) | Some(Value::String(_)) | None => None,
            Some(other) => return Err(ApiError::validation(format!("id must be a string, got {}", other))),
        };
        Ok(Self { id, attributes })
    }

    /// The identifier plus every attribute, as one JSON object
    pub fn to_value(&self) -> Value {
        let mut map = self.attributes.clone();
        if let Some(id) = &self.id {
            map.insert(ID_ATTRIBUTE.to_string(), Value::String(id.clone()));
        }
        Value::Object(map)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The identifier, or a validation error when the state has none
    pub fn require_id(&self) -> ApiResult<&str> {
        self.id().ok_or_else(|| ApiError::validation("resource has no id"))
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the resource as gone
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// Required, non-empty string attribute
    pub fn get_str(&self, key: &str) -> ApiResult<&str> {
        self.get_value(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::validation(format!("missing required attribute {}", key)))
    }

    /// Optional string attribute; empty strings read as absent
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_value(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get_value(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_value(key).and_then(Value::as_i64)
    }

    pub fn get_str_list(&self, key: &str) -> Vec<String> {
        match self.get_value(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn get_str_map(&self, key: &str) -> BTreeMap<String, String> {
        match self.get_value(key) {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect(),
            _ => BTreeMap::new(),
        }
    }

    /// Nested blocks, each viewed as its own attribute map
    pub fn get_object_list(&self, key: &str) -> Vec<ResourceData> {
        match self.get_value(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .map(|attributes| ResourceData { id: None, attributes })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Decode an attribute into a typed value
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> ApiResult<Option<T>> {
        match self.get_value(key) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ApiError::validation(format!("attribute {}: {}", key, e))),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> ApiResult<()> {
        let value = serde_json::to_value(value)?;
        self.attributes.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_extracts_id() {
        let data = ResourceData::from_value(json!({"id": "P1", "name": "ops"})).unwrap();
        assert_eq!(data.id(), Some("P1"));
        assert_eq!(data.get_str("name").unwrap(), "ops");
        assert!(data.attributes().get("id").is_none());
        assert_eq!(data.to_value()["id"], "P1");
    }

    #[test]
    fn test_missing_required_attribute_names_it() {
        let data = ResourceData::from_value(json!({"name": ""})).unwrap();
        let err = data.get_str("name").unwrap_err();
        assert!(err.to_string().contains("name"));
        assert!(matches!(data.get_str("app_id"), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_typed_accessors() {
        let data = ResourceData::from_value(json!({
            "flag": true,
            "count": 42,
            "list": ["a", "b", 3],
            "map": {"k": "v", "n": 1},
            "blocks": [{"type": "Environment", "value": "dev"}, "skip"],
            "gone": null
        }))
        .unwrap();

        assert!(data.get_bool("flag"));
        assert!(!data.get_bool("missing"));
        assert_eq!(data.get_i64("count"), Some(42));
        assert_eq!(data.get_str_list("list"), vec!["a", "b"]);
        assert_eq!(data.get_str_map("map").len(), 1);
        assert_eq!(data.get_object_list("blocks").len(), 1);
        assert!(data.get_value("gone").is_none());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(ResourceData::from_value(json!([1, 2])).is_err());
        assert!(ResourceData::from_value(json!({"id": 5})).is_err());
    }

    #[test]
    fn test_set_and_clear() {
        let mut data = ResourceData::new();
        data.set("tags", vec!["x"]).unwrap();
        data.set_id("T1");
        assert_eq!(data.require_id().unwrap(), "T1");
        data.clear_id();
        assert!(data.require_id().is_err());
        assert_eq!(data.get_str_list("tags"), vec!["x"]);
    }
}
