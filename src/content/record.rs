use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

/// One normalized content row: a flat `field -> value` object.
///
/// Every adapter converts its backend's envelope into this shape, so section
/// resolution never sees backend-specific structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRecord(Map<String, Value>);

impl ContentRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value; only objects qualify.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Serialize a typed value into a record.
    pub fn from_typed<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(value)?;
        Ok(Self::from_value(value).unwrap_or_default())
    }

    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0))
    }

    /// Field value, treating JSON `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Integer field; numeric strings are accepted since several CMSes
    /// serialize sort keys as text.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Numeric field, fractions kept. Accepts numeric strings like [`Self::get_i64`].
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        let value = match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|f| f.is_finite())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) => match s.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Row identifier as text, whether the backend uses strings or integers.
    pub fn id(&self) -> Option<String> {
        match self.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn retain(&mut self, keep: impl FnMut(&String, &mut Value) -> bool) {
        self.0.retain(keep);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ContentRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ContentRecord {
        ContentRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_null_is_absent() {
        let r = record(json!({"title": null, "subtitle": "Fast freight"}));
        assert!(r.get("title").is_none());
        assert!(!r.contains("title"));
        assert_eq!(r.get_str("subtitle"), Some("Fast freight"));
    }

    #[test]
    fn test_lenient_scalars() {
        let r = record(json!({"id": 7, "order": "3", "is_active": 0, "flag": "true"}));
        assert_eq!(r.id().as_deref(), Some("7"));
        assert_eq!(r.get_i64("order"), Some(3));
        assert_eq!(r.get_f64("order"), Some(3.0));
        assert_eq!(r.get_bool("is_active"), Some(false));
        assert_eq!(r.get_bool("flag"), Some(true));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(ContentRecord::from_value(json!([1, 2])).is_none());
        assert!(ContentRecord::from_value(json!("text")).is_none());
    }
}
