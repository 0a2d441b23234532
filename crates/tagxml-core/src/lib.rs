//! # tagxml-core
//!
//! Pure-Rust, type-preserving codec between JSON-like values and **type-tagged
//! XML**.
//!
//! XML has no integers, floats, booleans or null, and no object/array
//! distinction. tagxml records each value's type on its element instead, so
//! JSON → XML → JSON is lossless:
//!
//! ```xml
//! <ITEM type="object">
//!   <ITEM type="integer" key="a" value="1"></ITEM>
//!   <ITEM type="list" key="b"><ITEM type="boolean" value="true"></ITEM><ITEM type="null"></ITEM></ITEM>
//! </ITEM>
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use tagxml_core::{json_to_xml, xml_to_json};
//!
//! // JSON → XML
//! let json = r#"{"a":1,"b":[true,null]}"#;
//! let xml = json_to_xml(json).unwrap();
//! assert_eq!(
//!     xml,
//!     concat!(
//!         r#"<ITEM type="object"><ITEM type="integer" key="a" value="1"></ITEM>"#,
//!         r#"<ITEM type="list" key="b"><ITEM type="boolean" value="true"></ITEM>"#,
//!         r#"<ITEM type="null"></ITEM></ITEM></ITEM>"#,
//!     )
//! );
//!
//! // XML → JSON (roundtrip)
//! let back = xml_to_json(&xml).unwrap();
//! assert_eq!(back, json);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: `Value` model and `TypeTag`
//! - [`element`]: the tagged-element tree
//! - [`encoder`]: `Value` → element tree
//! - [`decoder`]: element tree → `Value`
//! - [`markup`]: XML bytes ⇄ element tree
//! - [`json`]: JSON bytes ⇄ `Value`
//! - [`error`]: Error types for parse/decode failures

pub mod decoder;
pub mod element;
pub mod encoder;
pub mod error;
pub mod json;
pub mod markup;
pub mod types;

pub use decoder::{decode_element, decode_element_with, DecodeOptions, DEFAULT_MAX_DEPTH};
pub use element::{Element, ELEMENT_NAME};
pub use encoder::encode_value;
pub use error::{CodecError, Result};
pub use json::{parse_json_bytes, parse_json_str};
pub use types::{tag_of, TypeTag, Value};

/// Parse XML bytes and decode them into a [`Value`].
///
/// Markup that is not well-formed fails with [`CodecError::MalformedMarkup`]
/// before any element is interpreted.
pub fn decode_markup(bytes: &[u8]) -> Result<Value> {
    decode_markup_with(bytes, &DecodeOptions::default())
}

/// [`decode_markup`] with explicit limits.
pub fn decode_markup_with(bytes: &[u8], options: &DecodeOptions) -> Result<Value> {
    let root = markup::parse_markup_with(bytes, options)?;
    decode_element_with(&root, options)
}

/// Encode a [`Value`] into canonical tagged XML.
pub fn encode_to_markup(value: &Value) -> Vec<u8> {
    markup::write_markup(&encode_value(value)).into_bytes()
}

/// Convert tagged XML text into compact JSON text.
pub fn xml_to_json(xml: &str) -> Result<String> {
    let value = decode_markup(xml.as_bytes())?;
    json::to_json_string(&value)
}

/// Convert JSON text into canonical tagged XML text.
pub fn json_to_xml(json: &str) -> Result<String> {
    let value = parse_json_str(json)?;
    Ok(markup::write_markup(&encode_value(&value)))
}
