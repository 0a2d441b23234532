//! Generic value model and the type tags stamped onto every XML element.
//!
//! `Value` mirrors JSON's data model but keeps integers and floats apart. That
//! distinction is fixed when a value is built (from a JSON literal's lexical
//! form, or from the `type` attribute of an element) and survives every
//! encode/decode cycle.

use std::fmt;
use std::str::FromStr;

/// A JSON-like value. Objects use `Vec<(String, Value)>` so insertion order is
/// kept without depending on `IndexMap`; keys are unique when built through
/// [`Value::insert`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    /// Only finite floats have a tagged form. `NaN` and infinities encode as
    /// Rust prints them and are rejected when decoded.
    Float(f64),
    /// Must hold only characters XML 1.0 allows; see [`crate::markup::is_xml_char`].
    String(String),
    Array(Vec<Value>),
    /// Key-value pairs in insertion order.
    ///
    /// Keys must be unique. The decoder keeps the last of repeated keys, so an
    /// object built with duplicates does not survive encode/decode unchanged;
    /// build objects with [`Value::insert`] to keep keys unique.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// An empty object, `{}`.
    pub fn object() -> Self {
        Value::Object(Vec::new())
    }

    /// The type tag this value is encoded with.
    pub fn tag(&self) -> TypeTag {
        TypeTag::of(self)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up an object member by key. Returns `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert a member into an object, replacing the value of an existing key
    /// in place (the key keeps its original position).
    ///
    /// Returns the previous value for the key, if any. Non-object values are
    /// left untouched and the new value is handed back.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let Value::Object(entries) = self else {
            return Some(value);
        };
        let key = key.into();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

/// The seven type tokens carried by the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Float,
    Integer,
    String,
    Boolean,
    Object,
    List,
    Null,
}

impl TypeTag {
    pub const ALL: [TypeTag; 7] = [
        TypeTag::Float,
        TypeTag::Integer,
        TypeTag::String,
        TypeTag::Boolean,
        TypeTag::Object,
        TypeTag::List,
        TypeTag::Null,
    ];

    /// Resolve the tag for a value. Total over every variant.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Integer(_) => TypeTag::Integer,
            Value::Float(_) => TypeTag::Float,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::List,
            Value::Object(_) => TypeTag::Object,
        }
    }

    /// The attribute token, e.g. `"integer"`.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Float => "float",
            TypeTag::Integer => "integer",
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
            TypeTag::Object => "object",
            TypeTag::List => "list",
            TypeTag::Null => "null",
        }
    }

    /// Leaf tags always carry a `value` attribute and never have children.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            TypeTag::Float | TypeTag::Integer | TypeTag::String | TypeTag::Boolean
        )
    }

    /// Container tags may have children and never carry a `value`.
    pub fn is_container(self) -> bool {
        matches!(self, TypeTag::Object | TypeTag::List)
    }
}

/// Shorthand for [`TypeTag::of`].
pub fn tag_of(value: &Value) -> TypeTag {
    TypeTag::of(value)
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a `type` attribute holds anything but the seven exact tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeTag(pub String);

impl fmt::Display for UnknownTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type tag {:?}", self.0)
    }
}

impl std::error::Error for UnknownTypeTag {}

impl FromStr for TypeTag {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTypeTag(s.to_string()))
    }
}
