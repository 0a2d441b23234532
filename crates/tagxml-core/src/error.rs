//! Error types for tagged-XML encoding and decoding operations.

use crate::types::TypeTag;
use thiserror::Error;

/// Errors that can occur while converting between values and tagged XML.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The input bytes were not well-formed XML. Raised by the markup parser
    /// before any element is interpreted.
    #[error("Malformed markup: {message}")]
    MalformedMarkup { message: String },

    /// Well-formed XML that breaks the tagged-element convention (unknown type
    /// token, leaf missing its value, mixed keyed/unkeyed siblings, ...).
    /// `path` locates the offending element, e.g. `$.items[2]`.
    #[error("Invalid schema at {path}: {message}")]
    InvalidSchema { path: String, message: String },

    /// A numeric leaf whose `value` text does not parse as its declared type.
    #[error("Cannot parse {text:?} as {tag} at {path}")]
    NumericParse {
        path: String,
        tag: TypeTag,
        text: String,
    },

    /// A value that has no tagged-element representation.
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// The input was not valid JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl CodecError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        CodecError::MalformedMarkup {
            message: message.into(),
        }
    }

    pub(crate) fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::InvalidSchema {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<quick_xml::Error> for CodecError {
    fn from(err: quick_xml::Error) -> Self {
        CodecError::malformed(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for CodecError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        CodecError::malformed(err.to_string())
    }
}

impl From<quick_xml::escape::EscapeError> for CodecError {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        CodecError::malformed(err.to_string())
    }
}

/// Convenience alias used throughout tagxml-core.
pub type Result<T> = std::result::Result<T, CodecError>;
