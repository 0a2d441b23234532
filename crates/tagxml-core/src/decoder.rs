//! Decoder: converts a tagged-element tree back into a [`Value`].
//!
//! Each node is decoded on its own, top-down:
//!
//! - **Leaves** (no children) are read from their `type` and `value` attributes.
//!   `null` has no value; `object` and `list` without a value are the empty
//!   container (`{}` is never confused with `null`).
//! - **Nodes with children** become an array when no child has a `key`, an
//!   object when every child has one. Mixing the two within one sibling group
//!   is rejected.
//!
//! # Key design decisions
//!
//! - **Keys belong to the parent**: a node never reads its own `key`. The
//!   parent decodes the child, then files the result under the child's key.
//!   A `key` on the root element is therefore ignored.
//! - **Last key wins**: repeated keys among siblings overwrite the earlier
//!   member, which keeps its original position.
//! - **Depth guard**: nesting beyond [`DecodeOptions::max_depth`] is reported
//!   as [`CodecError::InvalidSchema`] instead of exhausting the stack.

use std::fmt;

use crate::element::Element;
use crate::error::{CodecError, Result};
use crate::types::{TypeTag, Value};

/// Default limit on element nesting accepted by the decoder and markup parser.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest element nesting accepted; the root sits at depth 1.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn with_max_depth(max_depth: usize) -> Self {
        DecodeOptions { max_depth }
    }
}

/// Decode a tagged-element tree with the default options.
pub fn decode_element(root: &Element) -> Result<Value> {
    decode_element_with(root, &DecodeOptions::default())
}

/// Decode a tagged-element tree with explicit options.
pub fn decode_element_with(root: &Element, options: &DecodeOptions) -> Result<Value> {
    let mut path = Path::default();
    decode_node(root, 1, options, &mut path)
}

/// Decode one node, ignoring its own `key`.
fn decode_node(
    node: &Element,
    depth: usize,
    options: &DecodeOptions,
    path: &mut Path,
) -> Result<Value> {
    if depth > options.max_depth {
        return Err(CodecError::schema(
            path.to_string(),
            format!("nesting exceeds maximum depth of {}", options.max_depth),
        ));
    }

    let tag = resolve_tag(node, path)?;

    if node.is_leaf() {
        return decode_leaf(node, tag, path);
    }

    if !tag.is_container() {
        return Err(CodecError::schema(
            path.to_string(),
            format!("`{tag}` element cannot have children"),
        ));
    }
    if node.value.is_some() {
        return Err(CodecError::schema(
            path.to_string(),
            format!("`{tag}` element with children cannot carry a value"),
        ));
    }

    let keyed = node.children.iter().filter(|c| c.key.is_some()).count();
    if keyed == 0 {
        decode_array(&node.children, depth, options, path)
    } else if keyed == node.children.len() {
        decode_object(&node.children, depth, options, path)
    } else {
        Err(CodecError::schema(
            path.to_string(),
            "children mix keyed and unkeyed elements",
        ))
    }
}

/// Keyless children, decoded in document order.
fn decode_array(
    children: &[Element],
    depth: usize,
    options: &DecodeOptions,
    path: &mut Path,
) -> Result<Value> {
    let mut items = Vec::with_capacity(children.len());
    for (i, child) in children.iter().enumerate() {
        path.push(Segment::Index(i));
        items.push(decode_node(child, depth + 1, options, path)?);
        path.pop();
    }
    Ok(Value::Array(items))
}

/// Keyed children, filed under their keys. Repeated keys: last wins.
fn decode_object(
    children: &[Element],
    depth: usize,
    options: &DecodeOptions,
    path: &mut Path,
) -> Result<Value> {
    let mut object = Value::object();
    for child in children {
        // Callers only get here when every child is keyed.
        let Some(key) = child.key.as_deref() else {
            return Err(CodecError::schema(path.to_string(), "object member without a key"));
        };
        path.push(Segment::Key(key.to_string()));
        let value = decode_node(child, depth + 1, options, path)?;
        path.pop();
        object.insert(key, value);
    }
    Ok(object)
}

/// Decode a childless element from its `type` and `value` attributes.
fn decode_leaf(node: &Element, tag: TypeTag, path: &Path) -> Result<Value> {
    match (tag, node.value.as_deref()) {
        (TypeTag::Null, None) => Ok(Value::Null),
        (TypeTag::Object, None) => Ok(Value::object()),
        (TypeTag::List, None) => Ok(Value::Array(Vec::new())),
        (TypeTag::Null | TypeTag::Object | TypeTag::List, Some(_)) => Err(CodecError::schema(
            path.to_string(),
            format!("`{tag}` element cannot carry a value"),
        )),
        (_, None) => Err(CodecError::schema(
            path.to_string(),
            format!("`{tag}` element is missing its value attribute"),
        )),
        (TypeTag::String, Some(text)) => Ok(Value::String(text.to_string())),
        (TypeTag::Integer, Some(text)) => text
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| numeric_error(path, tag, text)),
        (TypeTag::Float, Some(text)) => match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Value::Float(f)),
            _ => Err(numeric_error(path, tag, text)),
        },
        (TypeTag::Boolean, Some("true")) => Ok(Value::Bool(true)),
        (TypeTag::Boolean, Some("false")) => Ok(Value::Bool(false)),
        (TypeTag::Boolean, Some(text)) => Err(CodecError::schema(
            path.to_string(),
            format!("boolean value must be exactly \"true\" or \"false\", got {text:?}"),
        )),
    }
}

fn resolve_tag(node: &Element, path: &Path) -> Result<TypeTag> {
    let Some(raw) = node.type_attr.as_deref() else {
        return Err(CodecError::schema(
            path.to_string(),
            "element is missing its type attribute",
        ));
    };
    raw.parse::<TypeTag>()
        .map_err(|e| CodecError::schema(path.to_string(), e.to_string()))
}

fn numeric_error(path: &Path, tag: TypeTag, text: &str) -> CodecError {
    CodecError::NumericParse {
        path: path.to_string(),
        tag,
        text: text.to_string(),
    }
}

/// Location of the node being decoded, rendered as `$`, `$.a`, `$.a[0]`.
#[derive(Debug, Default)]
pub(crate) struct Path {
    segments: Vec<Segment>,
}

#[derive(Debug)]
pub(crate) enum Segment {
    Key(String),
    Index(usize),
}

impl Path {
    pub(crate) fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) if is_plain_key(key) => write!(f, ".{key}")?,
                Segment::Key(key) => write!(f, "[{key:?}]")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

/// Keys matching `^[A-Za-z_][A-Za-z0-9_]*$` print with dot notation.
fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
