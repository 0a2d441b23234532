//! Bridge between [`Value`] and JSON text.
//!
//! This is the only place where a JSON literal's lexical form picks between
//! `Integer` and `Float`: numbers written with a fraction or exponent (`3.0`,
//! `1e3`) become floats, everything else an integer.
//!
//! Requires `serde_json`'s `preserve_order` feature so object members keep the
//! order they had in the input, and `arbitrary_precision` so integer literals
//! too large for `i64` can still be told apart from floats.
//!
//! Strings and keys must be representable in XML: characters XML 1.0 forbids
//! (most C0 controls, U+FFFE, U+FFFF) are rejected here rather than written
//! into markup no parser would accept.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

use crate::error::{CodecError, Result};
use crate::markup::is_xml_char;
use crate::types::Value;

/// Parse JSON bytes into a [`Value`].
///
/// Integers outside the `i64` range are rejected rather than widened to floats,
/// as are strings holding characters XML cannot carry.
pub fn parse_json_bytes(bytes: &[u8]) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_slice(bytes)?;
    Value::try_from(json)
}

/// Parse a JSON string into a [`Value`].
pub fn parse_json_str(json: &str) -> Result<Value> {
    parse_json_bytes(json.as_bytes())
}

impl TryFrom<serde_json::Value> for Value {
    type Error = CodecError;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => number_to_value(&n)?,
            serde_json::Value::String(s) => Value::String(xml_string(s)?),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_json::Value::Object(map) => {
                let mut object = Value::object();
                for (key, member) in map {
                    object.insert(xml_string(key)?, Value::try_from(member)?);
                }
                object
            }
        })
    }
}

/// With `arbitrary_precision`, a `Number` displays as its source literal, so a
/// literal without fraction or exponent is an integer whatever its magnitude.
fn number_to_value(n: &Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Integer(i));
    }
    let literal = n.to_string();
    if !literal.contains(['.', 'e', 'E']) {
        return Err(CodecError::UnsupportedValueType(format!(
            "integer {literal} is outside the 64-bit signed range"
        )));
    }
    n.as_f64()
        .filter(|f| f.is_finite())
        .map(Value::Float)
        .ok_or_else(|| {
            CodecError::UnsupportedValueType(format!("float {literal} is outside the f64 range"))
        })
}

fn xml_string(s: String) -> Result<String> {
    match s.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(CodecError::UnsupportedValueType(format!(
            "string {s:?} contains {c:?}, which XML cannot represent"
        ))),
        None => Ok(s),
    }
}

impl From<&Value> for serde_json::Value {
    /// Non-finite floats have no JSON form and become `null`.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(n) => serde_json::Value::Number((*n).into()),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        serde_json::Value::from(&value)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, member) in entries {
                    map.serialize_entry(key, member)?;
                }
                map.end()
            }
        }
    }
}

/// Render a value as compact JSON text.
pub fn to_json_string(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Render a value as indented JSON text.
pub fn to_json_string_pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
