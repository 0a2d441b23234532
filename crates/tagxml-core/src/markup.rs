//! Markup layer: XML bytes to [`Element`] trees and back.
//!
//! Parsing is delegated to `quick-xml`; this module only builds the owned
//! tree and rejects documents that are not a single well-formed element.
//! Serialization writes the canonical form the fixtures are compared
//! against:
//!
//! - attributes in the fixed order `type`, `key`, `value`
//! - explicit start and end tags for every element, even empty ones
//! - no declaration, no whitespace between elements
//! - attribute escaping as in Canonical XML (`&amp;`, `&lt;`, `&quot;`,
//!   `&#x9;`, `&#xA;`, `&#xD;`)

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::decoder::{DecodeOptions, Path, Segment};
use crate::element::Element;
use crate::error::{CodecError, Result};

/// Parse XML bytes into an element tree with the default depth limit.
pub fn parse_markup(bytes: &[u8]) -> Result<Element> {
    parse_markup_with(bytes, &DecodeOptions::default())
}

/// Parse XML bytes into an element tree.
///
/// Declarations, comments, processing instructions and DOCTYPE are skipped.
/// Whitespace between elements is ignored; any other text is rejected, as are
/// characters XML 1.0 does not allow, whether written raw or as references.
pub fn parse_markup_with(bytes: &[u8], options: &DecodeOptions) -> Result<Element> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| CodecError::malformed(format!("input is not valid UTF-8: {e}")))?;
    if let Some((pos, c)) = text.char_indices().find(|&(_, c)| !is_xml_char(c)) {
        return Err(CodecError::malformed(format!(
            "character {c:?} at byte {pos} is not allowed in XML"
        )));
    }
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(CodecError::malformed(format!(
                    "{e} (at byte {})",
                    reader.error_position()
                )))
            }
        };
        match event {
            Event::Start(start) => {
                let element = open_element(&start, stack.is_empty() && root.is_some())?;
                check_depth(&stack, &element, options)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&start, stack.is_empty() && root.is_some())?;
                check_depth(&stack, &element, options)?;
                attach(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(CodecError::malformed("unexpected closing tag"));
                };
                attach(element, &mut stack, &mut root);
            }
            Event::Text(text) if is_whitespace(&text) => {}
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
            // Text, CDATA and entity references all count as character data.
            _ => {
                if stack.is_empty() {
                    return Err(CodecError::malformed("character data outside the root element"));
                }
                return Err(CodecError::schema(
                    "$",
                    "elements cannot contain text content",
                ));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(CodecError::malformed(format!(
            "unclosed element <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| CodecError::malformed("document has no root element"))
}

/// Build an element from a start tag, keeping only `type`, `key` and `value`.
fn open_element(start: &BytesStart, after_root: bool) -> Result<Element> {
    if after_root {
        return Err(CodecError::malformed("document has more than one root element"));
    }
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| CodecError::malformed(format!("element name is not valid UTF-8: {e}")))?
        .to_string();
    let mut element = Element {
        name,
        type_attr: None,
        key: None,
        value: None,
        children: Vec::new(),
    };
    for attr in start.attributes() {
        let attr = attr?;
        let slot = match attr.key.as_ref() {
            b"type" => &mut element.type_attr,
            b"key" => &mut element.key,
            b"value" => &mut element.value,
            _ => continue,
        };
        let value = attr.unescape_value()?;
        if let Some(c) = value.chars().find(|&c| !is_xml_char(c)) {
            return Err(CodecError::malformed(format!(
                "attribute references character {c:?}, which is not allowed in XML"
            )));
        }
        *slot = Some(value.into_owned());
    }
    Ok(element)
}

/// Reject `element` if opening it under `stack` exceeds the depth limit.
///
/// Open elements are not yet attached to their parents, so an unkeyed
/// element's index is the number of siblings already closed.
fn check_depth(stack: &[Element], element: &Element, options: &DecodeOptions) -> Result<()> {
    if stack.len() < options.max_depth {
        return Ok(());
    }
    let mut path = Path::default();
    let children = stack.iter().skip(1).chain(std::iter::once(element));
    for (parent, child) in stack.iter().zip(children) {
        path.push(match &child.key {
            Some(key) => Segment::Key(key.clone()),
            None => Segment::Index(parent.children.len()),
        });
    }
    Err(CodecError::schema(
        path.to_string(),
        format!("nesting exceeds maximum depth of {}", options.max_depth),
    ))
}

/// Whether `c` is a legal XML 1.0 character.
///
/// Everything below U+0020 except tab, line feed and carriage return is
/// excluded, as are U+FFFE and U+FFFF.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t'
            | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Hand a finished element to its parent, or make it the root.
fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn is_whitespace(text: &BytesText) -> bool {
    text.as_ref()
        .iter()
        .all(|b| matches!(b, b' ' | b'\n' | b'\r' | b'\t'))
}

/// Serialize an element tree into canonical markup.
pub fn write_markup(root: &Element) -> String {
    let mut out = String::new();
    write_element(root, &mut out);
    out
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    write_attribute("type", element.type_attr.as_deref(), out);
    write_attribute("key", element.key.as_deref(), out);
    write_attribute("value", element.value.as_deref(), out);
    out.push('>');
    for child in &element.children {
        write_element(child, out);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn write_attribute(name: &str, value: Option<&str>, out: &mut String) {
    let Some(value) = value else {
        return;
    };
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
