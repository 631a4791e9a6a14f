//! Command parameters
//!
//! A command carries a map of named parameter values. Most values are plain
//! scalars; structured values (lists, nested objects) are tagged as
//! [`ParamValue::Json`] and travel as JSON text on query strings and form
//! bodies.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::Value;

trait JsonEncode: Send + Sync {
    fn encode(&self) -> serde_json::Result<Value>;
}

impl<T: Serialize + Send + Sync> JsonEncode for T {
    fn encode(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Structured value kept in its original form until the request is built.
///
/// Encoding is deferred, so a value that cannot be represented as JSON
/// (e.g. a map with non-string keys) fails when the command is executed.
#[derive(Clone)]
pub struct JsonParam(Arc<dyn JsonEncode>);

impl JsonParam {
    /// Encode the value as a JSON tree
    ///
    /// # Errors
    ///
    /// Returns the encoder error if the value has no JSON representation
    pub fn to_value(&self) -> serde_json::Result<Value> {
        self.0.encode()
    }
}

impl fmt::Debug for JsonParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_value() {
            Ok(value) => f.debug_tuple("JsonParam").field(&value).finish(),
            Err(err) => f.debug_tuple("JsonParam").field(&format_args!("<{err}>")).finish(),
        }
    }
}

/// Values compare by their JSON encoding; unencodable values never compare equal
impl PartialEq for JsonParam {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.to_value(), other.to_value()), (Ok(a), Ok(b)) if a == b)
    }
}

/// A single parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Scalar value sent as-is (strings, numbers, booleans)
    Plain(Value),
    /// Structured value that must be mapped to JSON text before transport
    Json(JsonParam),
}

impl ParamValue {
    /// Tag a structured value for JSON mapping.
    pub fn json<T: Serialize + Send + Sync + 'static>(value: T) -> Self {
        Self::Json(JsonParam(Arc::new(value)))
    }

    /// Whether this value has to be serialized to JSON text before transport
    pub fn is_json_mapped(&self) -> bool {
        matches!(self, Self::Json(_))
    }

    /// JSON tree of this value
    ///
    /// # Errors
    ///
    /// Returns the encoder error for a structured value with no JSON
    /// representation
    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            Self::Plain(value) => Ok(value.clone()),
            Self::Json(structured) => structured.to_value(),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Plain(value) => value.serialize(serializer),
            Self::Json(structured) => {
                structured.to_value().map_err(S::Error::custom)?.serialize(serializer)
            }
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(Value::String(text)) => f.write_str(text),
            Self::Plain(value) => write!(f, "{value}"),
            Self::Json(structured) => match structured.to_value() {
                Ok(value) => write!(f, "{value}"),
                Err(_) => f.write_str("<unencodable>"),
            },
        }
    }
}

macro_rules! plain_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Plain(Value::from(value))
                }
            }
        )*
    };
}

plain_from!(&str, String, bool, i32, i64, u32, u64, f64);

/// Named parameters of a command.
///
/// Ordering carries no meaning on the wire; entries are kept sorted so the
/// rendering used in error messages is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, ParamValue>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, returning the value it replaced
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Renders as `{name=value, other=value}`
impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (name, value)) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}
