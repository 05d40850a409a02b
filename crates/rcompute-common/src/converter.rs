//! Per-type JSON Conversion
//!
//! Most payloads travel with their plain `serde` representation. A few types
//! need a different wire shape, and a [`JsonConverter`] registered in a
//! [`ConverterRegistry`] overrides the default for exactly that type. The
//! registry is consulted in both directions:
//!
//! - encoding arguments (plain values and the inline side of [`Remote`])
//! - decoding results
//!
//! Converters are matched by [`TypeId`], so any type can opt in without the
//! dispatcher knowing about it ahead of time.
//!
//! [`Remote`]: crate::Remote

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::dictionary::ArchivableDictionaryConverter;
use crate::error::{ComputeError, Result};

/// Type-erased converter capability.
///
/// Implement [`TypeConverter`] instead unless you need to handle several
/// types with one converter.
pub trait JsonConverter: Send + Sync + 'static {
    /// Whether this converter owns the wire format of `type_id`.
    fn can_handle(&self, type_id: TypeId) -> bool;

    /// Encodes a value whose type this converter handles.
    fn encode(&self, value: &dyn Any) -> Result<Value>;

    /// Decodes a wire value into a boxed instance of a handled type.
    fn decode(&self, type_id: TypeId, value: Value) -> Result<Box<dyn Any>>;
}

/// Converter for a single concrete type.
pub trait TypeConverter: Send + Sync + 'static {
    type Target: Any;

    fn encode(&self, value: &Self::Target) -> Result<Value>;

    fn decode(&self, value: Value) -> Result<Self::Target>;
}

impl<C: TypeConverter> JsonConverter for C {
    fn can_handle(&self, type_id: TypeId) -> bool {
        type_id == TypeId::of::<C::Target>()
    }

    fn encode(&self, value: &dyn Any) -> Result<Value> {
        let value = value.downcast_ref::<C::Target>().ok_or_else(|| {
            ComputeError::Encode(format!(
                "converter for {} received a different type",
                type_name::<C::Target>()
            ))
        })?;
        TypeConverter::encode(self, value)
    }

    fn decode(&self, _type_id: TypeId, value: Value) -> Result<Box<dyn Any>> {
        let decoded = TypeConverter::decode(self, value)?;
        Ok(Box::new(decoded))
    }
}

/// Table of registered converters.
///
/// Lookups scan in registration order, so the most recently registered
/// converter does not shadow an earlier one for the same type. Register the
/// override first if two converters overlap.
///
/// Matching is on the exact top-level type of an argument or result. Values
/// nested inside another type (a `Vec<ArchivableDictionary>`, a field of a
/// struct, an `Option<T>`) go through plain `serde` and are not converted.
/// Register a converter for the outer type when the nested ones need it.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn JsonConverter>>,
}

impl ConverterRegistry {
    /// An empty registry: every type uses its `serde` representation.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the converters the compute service expects out of the
    /// box ([`ArchivableDictionaryConverter`]).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ArchivableDictionaryConverter);
        registry
    }

    /// Appends `converter` after the ones already registered.
    pub fn register<C: JsonConverter>(&mut self, converter: C) -> &mut Self {
        self.converters.push(Arc::new(converter));
        self
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Returns `true` if some converter handles `T`.
    pub fn handles<T: Any>(&self) -> bool {
        self.find(TypeId::of::<T>()).is_some()
    }

    fn find(&self, type_id: TypeId) -> Option<&Arc<dyn JsonConverter>> {
        self.converters.iter().find(|c| c.can_handle(type_id))
    }

    /// Encodes `value` through its registered converter, or through `serde`
    /// when none matches.
    pub fn encode_value<T: Serialize + Any>(&self, value: &T) -> Result<Value> {
        match self.find(TypeId::of::<T>()) {
            Some(converter) => converter.encode(value),
            None => serde_json::to_value(value).map_err(|e| {
                ComputeError::Encode(format!("failed to serialize {}: {}", type_name::<T>(), e))
            }),
        }
    }

    /// Decodes `value` as `T` through its registered converter, or through
    /// `serde` when none matches.
    pub fn decode_value<T: DeserializeOwned + Any>(&self, value: Value) -> Result<T> {
        match self.find(TypeId::of::<T>()) {
            Some(converter) => {
                let boxed = converter.decode(TypeId::of::<T>(), value)?;
                boxed.downcast::<T>().map(|b| *b).map_err(|_| {
                    ComputeError::Decode(format!(
                        "converter returned a value that is not {}",
                        type_name::<T>()
                    ))
                })
            }
            None => serde_json::from_value(value).map_err(|e| {
                ComputeError::Decode(format!("failed to deserialize {}: {}", type_name::<T>(), e))
            }),
        }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("converters", &self.converters.len())
            .finish()
    }
}
