//! By-value or by-reference arguments.
//!
//! Geometry arguments can be large. When the service already knows a piece of
//! data (it was uploaded earlier, or lives at some reachable location) the
//! caller can pass a URL instead of re-sending it. [`Remote`] captures that
//! choice for a single argument.

use std::any::Any;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::converter::ConverterRegistry;
use crate::error::{ComputeError, Result};

/// An argument that is either inline data or a URL reference to it.
///
/// # Wire payload
///
/// - `Remote::Value(v)` is sent as `v` itself.
/// - `Remote::Url(u)` is sent as `{"url": u}`.
///
/// # Example
///
/// ```
/// use rcompute_common::Remote;
/// use serde_json::json;
///
/// let by_ref: Remote<f64> = Remote::url("https://files.example.com/brep.json");
/// assert_eq!(
///     by_ref.wire_payload().unwrap(),
///     json!({"url": "https://files.example.com/brep.json"})
/// );
///
/// let by_value = Remote::value(2.5);
/// assert_eq!(by_value.wire_payload().unwrap(), json!(2.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    /// Inline data, sent as-is.
    Value(T),
    /// A location the server fetches the data from.
    Url(String),
}

#[derive(Serialize)]
struct UrlPayload<'a> {
    url: &'a str,
}

impl<T> Remote<T> {
    /// Wraps inline data.
    pub fn value(value: T) -> Self {
        Remote::Value(value)
    }

    /// References data by URL. The URL is sent verbatim.
    pub fn url(url: impl Into<String>) -> Self {
        Remote::Url(url.into())
    }

    /// Returns `true` for a URL reference.
    pub fn is_url(&self) -> bool {
        matches!(self, Remote::Url(_))
    }

    /// Returns the URL of a reference, or `None` for inline data.
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Remote::Url(url) => Some(url),
            Remote::Value(_) => None,
        }
    }

    /// Returns the inline data, or `None` for a reference.
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Remote::Value(value) => Some(value),
            Remote::Url(_) => None,
        }
    }
}

impl<T: Serialize> Remote<T> {
    /// Projects to the JSON payload using the default `serde` encoding.
    pub fn wire_payload(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(ComputeError::encode)
    }
}

impl<T: Serialize + Any> Remote<T> {
    /// Projects to the JSON payload, routing inline values through any
    /// converter registered for `T`.
    pub fn wire_payload_with(&self, converters: &ConverterRegistry) -> Result<Value> {
        match self {
            Remote::Value(value) => converters.encode_value(value),
            Remote::Url(url) => serde_json::to_value(UrlPayload { url }).map_err(ComputeError::encode),
        }
    }
}

impl<T: Serialize> Serialize for Remote<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Remote::Value(value) => value.serialize(serializer),
            Remote::Url(url) => UrlPayload { url }.serialize(serializer),
        }
    }
}

impl<T> From<T> for Remote<T> {
    fn from(value: T) -> Self {
        Remote::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArchivableDictionary;
    use serde_json::json;

    #[test]
    fn test_url_projection_is_exact() {
        for url in ["https://a.example/x", "", "s3://bucket/key?v=1"] {
            let remote: Remote<Value> = Remote::url(url);
            let payload = remote.wire_payload().unwrap();
            assert_eq!(payload, json!({ "url": url }));
            assert_eq!(payload.as_object().unwrap().len(), 1);
        }
    }

    #[test]
    fn test_url_never_serializes_inline_data() {
        let remote: Remote<Vec<f64>> = Remote::url("https://a.example/points");
        let text = serde_json::to_string(&remote).unwrap();
        assert_eq!(text, r#"{"url":"https://a.example/points"}"#);
    }

    #[test]
    fn test_value_projection_has_no_url() {
        let remote = Remote::value(json!({"type": "Brep", "data": [1, 2, 3]}));
        let payload = remote.wire_payload().unwrap();
        assert_eq!(payload, json!({"type": "Brep", "data": [1, 2, 3]}));
        assert!(payload.get("url").is_none());

        let scalar = Remote::value(7u32);
        assert_eq!(scalar.wire_payload().unwrap(), json!(7));
    }

    #[test]
    fn test_value_projection_uses_registered_converter() {
        let mut dict = ArchivableDictionary::new();
        dict.insert("k", "v");
        let remote = Remote::value(dict.clone());

        let plain = remote.wire_payload().unwrap();
        assert!(plain.is_object());

        let converted = remote.wire_payload_with(&ConverterRegistry::with_defaults()).unwrap();
        assert!(converted.is_string());
    }

    #[test]
    fn test_url_ignores_converter() {
        let remote: Remote<ArchivableDictionary> = Remote::url("https://a.example/dict");
        let payload = remote.wire_payload_with(&ConverterRegistry::with_defaults()).unwrap();
        assert_eq!(payload, json!({"url": "https://a.example/dict"}));
    }

    #[test]
    fn test_accessors() {
        let by_ref: Remote<i32> = Remote::url("u");
        assert!(by_ref.is_url());
        assert_eq!(by_ref.as_url(), Some("u"));
        assert_eq!(by_ref.as_value(), None);

        let by_val: Remote<i32> = 5.into();
        assert!(!by_val.is_url());
        assert_eq!(by_val.as_value(), Some(&5));
        assert_eq!(by_val.as_url(), None);
    }
}
