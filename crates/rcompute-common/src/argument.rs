//! Positional argument encoding.
//!
//! The compute service matches arguments by position, never by name, so a
//! request body is a JSON array in declaration order:
//!
//! ```text
//! [<arg0>, <arg1>, {"url": "..."}, ...]
//! ```
//!
//! Each [`Argument`] is either a plain value or a [`Remote`] that may stand
//! in for its data with a URL. Encoding is all-or-nothing: the first argument
//! that fails to serialize fails the whole body.

use std::any::Any;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::converter::ConverterRegistry;
use crate::error::{ComputeError, Result};
use crate::remote::Remote;

/// Something that can produce its own wire payload.
pub trait WireEncode: Send + Sync {
    fn wire_payload(&self, converters: &ConverterRegistry) -> Result<Value>;
}

struct PlainValue<'a, T>(&'a T);

impl<T: Serialize + Any + Send + Sync> WireEncode for PlainValue<'_, T> {
    fn wire_payload(&self, converters: &ConverterRegistry) -> Result<Value> {
        converters.encode_value(self.0)
    }
}

impl<T: Serialize + Any + Send + Sync> WireEncode for Remote<T> {
    fn wire_payload(&self, converters: &ConverterRegistry) -> Result<Value> {
        self.wire_payload_with(converters)
    }
}

/// One positional argument of a remote call.
///
/// # Example
///
/// ```
/// use rcompute_common::{encode_arguments, Argument, ConverterRegistry, Remote};
///
/// let distance = 2.5;
/// let curve: Remote<serde_json::Value> = Remote::url("https://files.example.com/curve.json");
///
/// let body = encode_arguments(
///     &[Argument::remote(&curve), Argument::plain(&distance)],
///     &ConverterRegistry::new(),
/// )
/// .unwrap();
/// assert_eq!(body, r#"[{"url":"https://files.example.com/curve.json"},2.5]"#);
/// ```
pub enum Argument<'a> {
    Plain(Box<dyn WireEncode + 'a>),
    Reference(&'a dyn WireEncode),
}

impl<'a> Argument<'a> {
    pub fn plain<T: Serialize + Any + Send + Sync>(value: &'a T) -> Self {
        Argument::Plain(Box::new(PlainValue(value)))
    }

    pub fn remote<T: Serialize + Any + Send + Sync>(value: &'a Remote<T>) -> Self {
        Argument::Reference(value)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Argument::Reference(_))
    }

    pub fn wire_payload(&self, converters: &ConverterRegistry) -> Result<Value> {
        match self {
            Argument::Plain(value) => value.wire_payload(converters),
            Argument::Reference(remote) => remote.wire_payload(converters),
        }
    }
}

impl fmt::Debug for Argument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Plain(_) => f.write_str("Argument::Plain(..)"),
            Argument::Reference(_) => f.write_str("Argument::Reference(..)"),
        }
    }
}

/// Encodes arguments to their payloads, preserving order.
pub fn encode_payloads(args: &[Argument<'_>], converters: &ConverterRegistry) -> Result<Vec<Value>> {
    args.iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.wire_payload(converters).map_err(|e| match e {
                ComputeError::Encode(msg) => ComputeError::Encode(format!("argument {}: {}", index, msg)),
                other => other,
            })
        })
        .collect()
}

/// Encodes arguments into the JSON array request body.
pub fn encode_arguments(args: &[Argument<'_>], converters: &ConverterRegistry) -> Result<String> {
    let payloads = encode_payloads(args, converters)?;
    serde_json::to_string(&payloads).map_err(ComputeError::encode)
}

/// Encodes several argument lists into one batch body: an array of arrays.
pub fn encode_batch(batches: &[Vec<Argument<'_>>], converters: &ConverterRegistry) -> Result<String> {
    let payloads = batches
        .iter()
        .map(|args| encode_payloads(args, converters).map(Value::Array))
        .collect::<Result<Vec<_>>>()?;
    serde_json::to_string(&payloads).map_err(ComputeError::encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArchivableDictionary;
    use serde::ser::Error as _;
    use serde::Serializer;
    use serde_json::json;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("degenerate geometry"))
        }
    }

    #[test]
    fn test_encode_preserves_order() {
        let a = 1;
        let b = "two";
        let c = vec![3.0, 3.5];
        let body = encode_arguments(
            &[Argument::plain(&a), Argument::plain(&b), Argument::plain(&c)],
            &ConverterRegistry::new(),
        )
        .unwrap();
        assert_eq!(body, r#"[1,"two",[3.0,3.5]]"#);
    }

    #[test]
    fn test_encode_empty_list() {
        let body = encode_arguments(&[], &ConverterRegistry::new()).unwrap();
        assert_eq!(body, "[]");
    }

    #[test]
    fn test_references_are_unwrapped() {
        let by_ref: Remote<Value> = Remote::url("https://a.example/brep");
        let by_val = Remote::value(json!({"type": "Point3d", "X": 1.0}));
        let tolerance = 0.01;

        let payloads = encode_payloads(
            &[Argument::remote(&by_ref), Argument::remote(&by_val), Argument::plain(&tolerance)],
            &ConverterRegistry::new(),
        )
        .unwrap();
        assert_eq!(payloads[0], json!({"url": "https://a.example/brep"}));
        assert_eq!(payloads[1], json!({"type": "Point3d", "X": 1.0}));
        assert_eq!(payloads[2], json!(0.01));
    }

    #[test]
    fn test_round_trip_as_raw_array() {
        let scalar = 42i64;
        let array = vec![1, 2, 3];
        let object = json!({"name": "plate", "thickness": 2.0});
        let text = "hello".to_string();
        let args = [
            Argument::plain(&scalar),
            Argument::plain(&array),
            Argument::plain(&object),
            Argument::plain(&text),
        ];

        let body = encode_arguments(&args, &ConverterRegistry::new()).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.len(), args.len());
        assert_eq!(parsed[0], json!(42));
        assert_eq!(parsed[1], json!([1, 2, 3]));
        assert_eq!(parsed[2], object);
        assert_eq!(parsed[3], json!("hello"));
    }

    #[test]
    fn test_failure_is_fatal_for_whole_body() {
        let good = 1;
        let bad = Unserializable;
        let err = encode_arguments(
            &[Argument::plain(&good), Argument::plain(&bad)],
            &ConverterRegistry::new(),
        )
        .unwrap_err();
        match err {
            ComputeError::Encode(msg) => assert!(msg.starts_with("argument 1:"), "{}", msg),
            other => panic!("expected encode error, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_argument_uses_converter() {
        let mut dict = ArchivableDictionary::new();
        dict.insert("layer", "Default");
        let payloads = encode_payloads(&[Argument::plain(&dict)], &ConverterRegistry::with_defaults()).unwrap();
        assert!(payloads[0].is_string());
    }

    #[test]
    fn test_encode_batch() {
        let a1 = 1;
        let a2 = 2;
        let b = 0.5;
        let batches = vec![
            vec![Argument::plain(&a1), Argument::plain(&b)],
            vec![Argument::plain(&a2), Argument::plain(&b)],
        ];
        let body = encode_batch(&batches, &ConverterRegistry::new()).unwrap();
        assert_eq!(body, "[[1,0.5],[2,0.5]]");
    }

    #[test]
    fn test_is_reference() {
        let r: Remote<i32> = Remote::url("u");
        let v = 3;
        assert!(Argument::remote(&r).is_reference());
        assert!(!Argument::plain(&v).is_reference());
    }
}
