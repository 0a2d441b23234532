//! Encoder: converts a [`Value`] into a tagged-element tree.
//!
//! Every value becomes one `ITEM` element whose `type` attribute records the
//! variant:
//!
//! - **Scalars** carry their text in `value` (`integer`, `float`, `string`,
//!   `boolean`); `null` carries nothing.
//! - **Objects** get one child per member, in insertion order, with the
//!   member name in the child's `key`.
//! - **Arrays** (`list`) get one keyless child per item.
//!
//! Encoding is total: every `Value` has a representation.
//!
//! # Example
//! ```
//! use tagxml_core::{encode_value, Value};
//! let el = encode_value(&Value::Integer(3));
//! assert_eq!(el.type_attr.as_deref(), Some("integer"));
//! assert_eq!(el.value.as_deref(), Some("3"));
//! ```

use crate::element::Element;
use crate::types::{TypeTag, Value};

/// Encode a value into a tagged-element tree. The root has no `key`.
pub fn encode_value(value: &Value) -> Element {
    let element = Element::new(TypeTag::of(value).as_str());
    match value {
        Value::Null => element,
        Value::Bool(b) => element.with_value(if *b { "true" } else { "false" }),
        Value::Integer(n) => element.with_value(n.to_string()),
        Value::Float(f) => element.with_value(format_float(*f)),
        Value::String(s) => element.with_value(s.as_str()),
        Value::Array(items) => Element {
            children: items.iter().map(encode_value).collect(),
            ..element
        },
        Value::Object(entries) => Element {
            children: entries
                .iter()
                .map(|(key, member)| encode_value(member).with_key(key.as_str()))
                .collect(),
            ..element
        },
    }
}

/// Format a float so that it re-parses to the same bits and still reads as a
/// float: `3.0` keeps its `.0`, `0.1` stays `0.1`, `1e300` keeps its exponent.
///
/// `{:?}` already produces the shortest round-tripping form with a fractional
/// part or exponent for finite values; non-finite values have no tagged form
/// and are emitted as Rust prints them.
pub fn format_float(f: f64) -> String {
    format!("{f:?}")
}
