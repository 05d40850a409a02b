//! Archivable Dictionaries
//!
//! [`ArchivableDictionary`] is a string-keyed bag of user data that the
//! compute service does not accept as a plain JSON object. On the wire it is
//! an archive envelope serialized to a string, and that string is sent as a
//! JSON string value:
//!
//! ```text
//! "{\"version\":10000,\"archive3dm\":70,\"opennurbs\":0,\"data\":{\"key\":1}}"
//! ```
//!
//! [`ArchivableDictionaryConverter`] performs that wrapping and unwrapping
//! and is registered by [`ConverterRegistry::with_defaults`].
//!
//! [`ConverterRegistry::with_defaults`]: crate::ConverterRegistry::with_defaults

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::converter::TypeConverter;
use crate::error::{ComputeError, Result};

const ARCHIVE_VERSION: u32 = 10000;
const ARCHIVE_3DM: u32 = 70;

/// String-keyed user data attached to geometry.
///
/// Without a registered converter it serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchivableDictionary {
    entries: BTreeMap<String, Value>,
}

impl ArchivableDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ArchivableDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ArchiveEnvelope {
    version: u32,
    archive3dm: u32,
    #[serde(default)]
    opennurbs: i64,
    data: BTreeMap<String, Value>,
}

/// Wire converter for [`ArchivableDictionary`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchivableDictionaryConverter;

impl TypeConverter for ArchivableDictionaryConverter {
    type Target = ArchivableDictionary;

    fn encode(&self, value: &ArchivableDictionary) -> Result<Value> {
        let envelope = ArchiveEnvelope {
            version: ARCHIVE_VERSION,
            archive3dm: ARCHIVE_3DM,
            opennurbs: 0,
            data: value.entries.clone(),
        };
        let inner = serde_json::to_string(&envelope).map_err(ComputeError::encode)?;
        Ok(Value::String(inner))
    }

    fn decode(&self, value: Value) -> Result<ArchivableDictionary> {
        match value {
            Value::String(inner) => {
                let envelope: ArchiveEnvelope = serde_json::from_str(&inner).map_err(|e| {
                    ComputeError::Decode(format!("invalid dictionary archive: {}", e))
                })?;
                Ok(ArchivableDictionary { entries: envelope.data })
            }
            // Some endpoints echo dictionaries back unwrapped.
            Value::Object(_) => serde_json::from_value(value).map_err(ComputeError::decode),
            other => Err(ComputeError::Decode(format!(
                "expected an encoded dictionary, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConverterRegistry;
    use serde_json::json;

    fn sample() -> ArchivableDictionary {
        let mut dict = ArchivableDictionary::new();
        dict.insert("name", "bracket");
        dict.insert("count", 3);
        dict.insert("weights", json!([0.5, 1.0]));
        dict
    }

    #[test]
    fn test_plain_serde_is_object() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value, json!({"count": 3, "name": "bracket", "weights": [0.5, 1.0]}));
    }

    #[test]
    fn test_converter_wraps_as_string() {
        let encoded = TypeConverter::encode(&ArchivableDictionaryConverter, &sample()).unwrap();
        let inner = encoded.as_str().expect("encoded dictionary should be a JSON string");
        let envelope: Value = serde_json::from_str(inner).unwrap();
        assert_eq!(envelope["version"], json!(10000));
        assert_eq!(envelope["archive3dm"], json!(70));
        assert_eq!(envelope["data"]["name"], json!("bracket"));
    }

    #[test]
    fn test_registry_round_trip() {
        let registry = ConverterRegistry::with_defaults();
        let original = sample();

        let encoded = registry.encode_value(&original).unwrap();
        assert!(encoded.is_string());

        let decoded: ArchivableDictionary = registry.decode_value(encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_accepts_plain_object() {
        let decoded = TypeConverter::decode(&ArchivableDictionaryConverter, json!({"a": 1})).unwrap();
        assert_eq!(decoded.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(TypeConverter::decode(&ArchivableDictionaryConverter, json!("not json")).is_err());
        assert!(TypeConverter::decode(&ArchivableDictionaryConverter, json!(42)).is_err());
    }

    #[test]
    fn test_from_iterator() {
        let dict: ArchivableDictionary = [("x", 1), ("y", 2)].into_iter().collect();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("y"), Some(&json!(2)));
    }
}
