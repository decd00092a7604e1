//! JSON/YAML backed settings tree
//!
//! Uses JSON as the in-memory representation; YAML documents are converted
//! on load. Key order of the document is preserved.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::error::SettingsError;
use crate::read::SettingsRead;

/// Settings subtree
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsTree {
    /// Entries of this subtree
    entries: Map<String, JsonValue>,

    /// Slash-separated location from the document root
    path: String,
}

impl SettingsTree {
    /// Empty root tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Map::new(),
            path: "/".to_string(),
        }
    }

    /// Root tree from a JSON value
    ///
    /// # Errors
    /// Returns error if `value` is not an object
    pub fn from_value(value: JsonValue) -> Result<Self, SettingsError> {
        match value {
            JsonValue::Object(entries) => Ok(Self {
                entries,
                path: "/".to_string(),
            }),
            other => Err(SettingsError::NotAnObject(kind(&other))),
        }
    }

    /// Parse from JSON string
    ///
    /// # Errors
    /// Returns error if JSON is invalid or not an object
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse from YAML string
    ///
    /// # Errors
    /// Returns error if YAML is invalid or not a mapping
    pub fn from_yaml(yaml: &str) -> Result<Self, SettingsError> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Read a file, choosing the format by extension
    ///
    /// # Errors
    /// IO failures, unknown extensions and malformed documents
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = std::fs::read_to_string(path).map_err(|e| SettingsError::io_error(path, e))?;
        tracing::debug!(path = %path.display(), extension = %ext, "reading settings file");
        match ext.as_str() {
            "json" => Self::from_json(&text),
            "yaml" | "yml" => Self::from_yaml(&text),
            _ => Err(SettingsError::UnsupportedFormat(ext)),
        }
    }

    /// Set an entry, replacing any previous value
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set an entry in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Deserialize the entry at `key` into a typed struct
    ///
    /// # Errors
    /// Missing key or mismatching structure
    pub fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<T, SettingsError> {
        let value = self.entry(key)?;
        serde_json::from_value(value.clone()).map_err(|source| SettingsError::Deserialize {
            path: self.path.clone(),
            key: key.to_string(),
            source,
        })
    }

    /// Underlying JSON of this subtree
    #[must_use]
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(self.entries.clone())
    }

    /// Serialize to JSON string
    ///
    /// # Errors
    /// Returns error if serialization fails (rare for JSON)
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    fn entry(&self, key: &str) -> Result<&JsonValue, SettingsError> {
        self.entries.get(key).ok_or_else(|| SettingsError::Missing {
            path: self.path.clone(),
            key: key.to_string(),
        })
    }

    fn mismatch(&self, key: &str, expected: &'static str, found: &JsonValue) -> SettingsError {
        SettingsError::TypeMismatch {
            path: self.path.clone(),
            key: key.to_string(),
            expected,
            found: kind(found),
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path == "/" {
            format!("/{key}")
        } else {
            format!("{}/{key}", self.path)
        }
    }

    fn int_from(&self, key: &str, value: &JsonValue) -> Result<i32, SettingsError> {
        let wide = value
            .as_i64()
            .ok_or_else(|| self.mismatch(key, "int", value))?;
        i32::try_from(wide).map_err(|_| SettingsError::OutOfRange {
            path: self.path.clone(),
            key: key.to_string(),
            value: wide.to_string(),
            expected: "int",
        })
    }

    fn array(&self, key: &str) -> Result<&Vec<JsonValue>, SettingsError> {
        let value = self.entry(key)?;
        value
            .as_array()
            .ok_or_else(|| self.mismatch(key, "array", value))
    }
}

impl Default for SettingsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsRead for SettingsTree {
    fn path(&self) -> &str {
        &self.path
    }

    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn get_int(&self, key: &str) -> Result<i32, SettingsError> {
        let value = self.entry(key)?;
        self.int_from(key, value)
    }

    fn get_long(&self, key: &str) -> Result<i64, SettingsError> {
        let value = self.entry(key)?;
        value.as_i64().ok_or_else(|| self.mismatch(key, "long", value))
    }

    fn get_double(&self, key: &str) -> Result<f64, SettingsError> {
        let value = self.entry(key)?;
        value
            .as_f64()
            .ok_or_else(|| self.mismatch(key, "double", value))
    }

    fn get_bool(&self, key: &str) -> Result<bool, SettingsError> {
        let value = self.entry(key)?;
        value
            .as_bool()
            .ok_or_else(|| self.mismatch(key, "boolean", value))
    }

    fn get_string(&self, key: &str) -> Result<String, SettingsError> {
        let value = self.entry(key)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.mismatch(key, "string", value))
    }

    fn get_password(&self, key: &str) -> Result<String, SettingsError> {
        let value = self.entry(key)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.mismatch(key, "password", value))
    }

    fn get_int_array(&self, key: &str) -> Result<Vec<i32>, SettingsError> {
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(i, v)| self.int_from(&format!("{key}[{i}]"), v))
            .collect()
    }

    fn get_double_array(&self, key: &str) -> Result<Vec<f64>, SettingsError> {
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_f64()
                    .ok_or_else(|| self.mismatch(&format!("{key}[{i}]"), "double", v))
            })
            .collect()
    }

    fn get_string_array(&self, key: &str) -> Result<Vec<String>, SettingsError> {
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.mismatch(&format!("{key}[{i}]"), "string", v))
            })
            .collect()
    }

    fn get_config(&self, key: &str) -> Result<Self, SettingsError> {
        let value = self.entry(key)?;
        match value {
            JsonValue::Object(entries) => Ok(Self {
                entries: entries.clone(),
                path: self.child_path(key),
            }),
            other => Err(self.mismatch(key, "config", other)),
        }
    }
}

/// Name of a JSON value's type, for mismatch messages
fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => "integer",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "config",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> SettingsTree {
        SettingsTree::from_value(json!({
            "id": 3,
            "big": 5_000_000_000_i64,
            "ratio": 0.5,
            "enabled": true,
            "name": "Row Filter",
            "secret": "hunter2",
            "bounds": [10, 20, 100, 50],
            "weights": [1, 2.5],
            "tags": ["a", "b"],
            "child": {"x": 1}
        }))
        .unwrap()
    }

    #[test]
    fn typed_reads() {
        let s = sample();
        assert_eq!(s.get_int("id").unwrap(), 3);
        assert_eq!(s.get_long("big").unwrap(), 5_000_000_000);
        assert!((s.get_double("ratio").unwrap() - 0.5).abs() < f64::EPSILON);
        assert!((s.get_double("id").unwrap() - 3.0).abs() < f64::EPSILON);
        assert!(s.get_bool("enabled").unwrap());
        assert_eq!(s.get_string("name").unwrap(), "Row Filter");
        assert_eq!(s.get_password("secret").unwrap(), "hunter2");
        assert_eq!(s.get_int_array("bounds").unwrap(), vec![10, 20, 100, 50]);
        assert_eq!(s.get_double_array("weights").unwrap(), vec![1.0, 2.5]);
        assert_eq!(s.get_string_array("tags").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn missing_key() {
        let err = sample().get_int("nope").unwrap_err();
        assert!(err.is_missing());
        assert_eq!(err.to_string(), "no entry 'nope' in /");
    }

    #[test]
    fn type_mismatch() {
        let err = sample().get_int("name").unwrap_err();
        assert!(err.is_type_mismatch());
        assert_eq!(err.to_string(), "entry 'name' in /: expected int, found string");
    }

    #[test]
    fn int_out_of_range() {
        let err = sample().get_int("big").unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { .. }));
    }

    #[test]
    fn array_element_mismatch_names_index() {
        let s = SettingsTree::new().with("xs", json!([1, "two"]));
        let err = s.get_int_array("xs").unwrap_err();
        assert_eq!(err.to_string(), "entry 'xs[1]' in /: expected int, found string");
    }

    #[test]
    fn subtree_paths() {
        let s = SettingsTree::new().with("a", json!({"b": {"c": "x"}}));
        let b = s.get_config("a").unwrap().get_config("b").unwrap();
        assert_eq!(b.path(), "/a/b");
        let err = b.get_int("c").unwrap_err();
        assert_eq!(err.to_string(), "entry 'c' in /a/b: expected int, found string");
        assert!(s.get_config("a").unwrap().get_config("missing").unwrap_err().is_missing());
    }

    #[test]
    fn keys_keep_document_order() {
        let s = SettingsTree::from_json(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        assert_eq!(s.keys(), vec!["z", "a", "m"]);
    }

    #[test]
    fn optional_reads() {
        let s = sample();
        assert_eq!(s.get_optional("id", SettingsTree::get_int).unwrap(), Some(3));
        assert_eq!(s.get_optional("nope", SettingsTree::get_int).unwrap(), None);
        assert!(s.get_optional("name", SettingsTree::get_int).is_err());
    }

    #[test]
    fn yaml_and_typed() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Child {
            x: i32,
        }
        let s = SettingsTree::from_yaml("child:\n  x: 4\nname: n\n").unwrap();
        assert_eq!(s.get_typed::<Child>("child").unwrap(), Child { x: 4 });
        assert_eq!(s.get_string("name").unwrap(), "n");
    }

    #[test]
    fn root_must_be_object() {
        assert!(matches!(
            SettingsTree::from_json("[1, 2]"),
            Err(SettingsError::NotAnObject("array"))
        ));
        assert!(SettingsTree::from_json("not valid json").is_err());
    }
}
