//! rcompute Common Types
//!
//! This crate provides the wire protocol shared by every remote geometry
//! compute call.
//!
//! # Overview
//!
//! A compute call is a single HTTP POST. The operation is named by a REST
//! path derived from its owning type and member name. The body is a JSON
//! array of positional arguments, and the response is either one JSON value
//! or an array of values for calls that return several results.
//!
//! # Components
//!
//! - [`address`] - Operation addresses (`Rhino.Geometry.Curve` + `Offset` → `/rhino/geometry/curve/offset`)
//! - [`remote`] - [`Remote<T>`]: pass a value inline or by URL
//! - [`argument`] - Positional argument list and body encoding
//! - [`converter`] - Per-type JSON overrides consulted when encoding and decoding
//! - [`dictionary`] - [`ArchivableDictionary`] and its string-wrapped wire format
//! - [`decode`] - Single and tuple-style result decoding
//! - [`auth`] - Bearer token / API key headers
//! - [`error`] - [`ComputeError`] and its [`ErrorKind`] taxonomy
//!
//! # Example
//!
//! ```
//! use rcompute_common::{decode, encode_arguments, Argument, ConverterRegistry, OperationAddress, Remote};
//!
//! let converters = ConverterRegistry::with_defaults();
//! let addr = OperationAddress::new("Rhino.Geometry.Curve", "ClosestPoint");
//!
//! let curve: Remote<serde_json::Value> = Remote::url("https://files.example.com/c.json");
//! let point = [1.0, 2.0, 0.0];
//! let body = encode_arguments(&[Argument::remote(&curve), Argument::plain(&point)], &converters).unwrap();
//! assert!(body.starts_with(r#"[{"url":"#));
//!
//! // `[true, 0.5]` from the server becomes (found, parameter)
//! let (found, t): (bool, f64) = decode::decode_pair(b"[true, 0.5]", &converters).unwrap();
//! assert!(found);
//! assert_eq!(t, 0.5);
//! assert_eq!(addr.as_str(), "/rhino/geometry/curve/closestpoint");
//! ```

pub mod address;
pub mod argument;
pub mod auth;
pub mod converter;
pub mod decode;
pub mod dictionary;
pub mod error;
pub mod remote;

pub use address::{build_address, OperationAddress, MULTIPLE_QUERY};
pub use argument::{encode_arguments, encode_batch, encode_payloads, Argument, WireEncode};
pub use auth::Credentials;
pub use converter::{ConverterRegistry, JsonConverter, TypeConverter};
pub use dictionary::{ArchivableDictionary, ArchivableDictionaryConverter};
pub use error::{ComputeError, ErrorKind, Result};
pub use remote::Remote;
