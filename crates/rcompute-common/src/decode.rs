//! Response decoding.
//!
//! A call declares how many results it expects:
//!
//! - one result: the entire body is that value
//! - two or three results: the body is a JSON array; element 0 is the
//!   primary return value and the following elements are the out values, in
//!   declaration order
//!
//! A multi-result response with fewer elements than declared is an error.
//! Missing results are never filled with defaults.

use std::any::Any;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::converter::ConverterRegistry;
use crate::error::{ComputeError, Result};

pub fn parse_body(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body)
        .map_err(|e| ComputeError::Decode(format!("response is not valid JSON: {}", e)))
}

/// Splits a multi-result response into exactly `arity` values.
///
/// Extra trailing elements are dropped.
pub fn split_results(value: Value, arity: usize) -> Result<Vec<Value>> {
    let mut items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ComputeError::Decode(format!(
                "expected an array of {} results, got {}",
                arity,
                json_kind(&other)
            )))
        }
    };

    if items.len() < arity {
        return Err(ComputeError::ArityMismatch {
            expected: arity,
            actual: items.len(),
        });
    }
    if items.len() > arity {
        tracing::debug!(
            "Response carried {} results, {} declared; ignoring the rest",
            items.len(),
            arity
        );
        items.truncate(arity);
    }
    Ok(items)
}

pub fn decode_single<T>(body: &[u8], converters: &ConverterRegistry) -> Result<T>
where
    T: DeserializeOwned + Any,
{
    let value = parse_body(body)?;
    converters.decode_value(value)
}

pub fn decode_pair<T0, T1>(body: &[u8], converters: &ConverterRegistry) -> Result<(T0, T1)>
where
    T0: DeserializeOwned + Any,
    T1: DeserializeOwned + Any,
{
    let mut items = split_results(parse_body(body)?, 2).map(|v| v.into_iter())?;
    let r0 = next_result(&mut items, 0, converters)?;
    let r1 = next_result(&mut items, 1, converters)?;
    Ok((r0, r1))
}

pub fn decode_triple<T0, T1, T2>(body: &[u8], converters: &ConverterRegistry) -> Result<(T0, T1, T2)>
where
    T0: DeserializeOwned + Any,
    T1: DeserializeOwned + Any,
    T2: DeserializeOwned + Any,
{
    let mut items = split_results(parse_body(body)?, 3).map(|v| v.into_iter())?;
    let r0 = next_result(&mut items, 0, converters)?;
    let r1 = next_result(&mut items, 1, converters)?;
    let r2 = next_result(&mut items, 2, converters)?;
    Ok((r0, r1, r2))
}

/// Decodes a batch response: one element per submitted argument list.
///
/// Unlike multi-result calls, the length must match exactly; a longer array
/// no longer lines up with the submitted lists.
pub fn decode_batch<T>(body: &[u8], expected: usize, converters: &ConverterRegistry) -> Result<Vec<T>>
where
    T: DeserializeOwned + Any,
{
    let items = match parse_body(body)? {
        Value::Array(items) => items,
        other => {
            return Err(ComputeError::Decode(format!(
                "expected an array of {} batch results, got {}",
                expected,
                json_kind(&other)
            )))
        }
    };
    if items.len() != expected {
        return Err(ComputeError::ArityMismatch {
            expected,
            actual: items.len(),
        });
    }
    items
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            converters
                .decode_value(value)
                .map_err(|e| with_context(e, "batch item", index))
        })
        .collect()
}

fn next_result<T>(
    items: &mut impl Iterator<Item = Value>,
    index: usize,
    converters: &ConverterRegistry,
) -> Result<T>
where
    T: DeserializeOwned + Any,
{
    // split_results guarantees the length
    let value = items
        .next()
        .ok_or_else(|| ComputeError::Decode(format!("missing result {}", index)))?;
    converters
        .decode_value(value)
        .map_err(|e| with_context(e, "result", index))
}

fn with_context(err: ComputeError, what: &str, index: usize) -> ComputeError {
    match err {
        ComputeError::Decode(msg) => ComputeError::Decode(format!("{} {}: {}", what, index, msg)),
        other => other,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArchivableDictionary;
    use serde_json::json;

    fn converters() -> ConverterRegistry {
        ConverterRegistry::with_defaults()
    }

    #[test]
    fn test_single_int() {
        let value: i32 = decode_single(b"42", &converters()).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_single_whole_body_even_if_array() {
        let value: Vec<f64> = decode_single(b"[1.0, 2.0]", &converters()).unwrap();
        assert_eq!(value, vec![1.0, 2.0]);
    }

    #[test]
    fn test_single_invalid_json() {
        let err = decode_single::<i32>(b"{not json", &converters()).unwrap_err();
        assert!(matches!(err, ComputeError::Decode(_)));
    }

    #[test]
    fn test_single_type_mismatch() {
        let err = decode_single::<i32>(b"\"x\"", &converters()).unwrap_err();
        assert!(matches!(err, ComputeError::Decode(_)));
    }

    #[test]
    fn test_triple_mixed_types() {
        let (a, b, c): (i32, f64, String) = decode_triple(br#"[1, 2.5, "x"]"#, &converters()).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2.5);
        assert_eq!(c, "x");
    }

    #[test]
    fn test_pair_short_array_fails() {
        let err = decode_pair::<i32, i32>(b"[1]", &converters()).unwrap_err();
        match err {
            ComputeError::ArityMismatch { expected, actual } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected arity mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_pair_requires_array() {
        let err = decode_pair::<i32, i32>(b"{\"a\": 1}", &converters()).unwrap_err();
        assert!(matches!(err, ComputeError::Decode(_)));
    }

    #[test]
    fn test_pair_extra_elements_ignored() {
        let (ok, t): (bool, f64) = decode_pair(b"[true, 0.25, 99]", &converters()).unwrap();
        assert!(ok);
        assert_eq!(t, 0.25);
    }

    #[test]
    fn test_element_type_error_names_index() {
        let err = decode_pair::<i32, i32>(br#"[1, "two"]"#, &converters()).unwrap_err();
        assert!(err.to_string().contains("result 1"), "{}", err);
    }

    #[test]
    fn test_out_value_uses_converter() {
        let encoded = converters()
            .encode_value(&[("k", 1)].into_iter().collect::<ArchivableDictionary>())
            .unwrap();
        let body = serde_json::to_vec(&json!([true, encoded])).unwrap();

        let (ok, dict): (bool, ArchivableDictionary) = decode_pair(&body, &converters()).unwrap();
        assert!(ok);
        assert_eq!(dict.get("k"), Some(&json!(1)));
    }

    #[test]
    fn test_batch() {
        let values: Vec<i32> = decode_batch(b"[1, 2, 3]", 3, &converters()).unwrap();
        assert_eq!(values, vec![1, 2, 3]);

        let err = decode_batch::<i32>(b"[1, 2]", 3, &converters()).unwrap_err();
        assert!(matches!(err, ComputeError::ArityMismatch { expected: 3, actual: 2 }));
    }

    #[test]
    fn test_batch_longer_response_fails() {
        let err = decode_batch::<i32>(b"[1, 2, 3]", 2, &converters()).unwrap_err();
        assert!(matches!(err, ComputeError::ArityMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_batch_requires_array() {
        let err = decode_batch::<i32>(b"7", 1, &converters()).unwrap_err();
        assert!(matches!(err, ComputeError::Decode(_)));
    }
}
