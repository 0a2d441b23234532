//! The tagged-element tree: the in-memory form of the XML side of the codec.

/// Name given to every element the encoder produces. The decoder accepts any
/// name; only the attributes carry meaning.
pub const ELEMENT_NAME: &str = "ITEM";

/// One XML element of the tagged convention.
///
/// Attributes are kept as raw text so the markup parser stays independent of
/// the convention; [`crate::decoder`] validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Raw `type` attribute.
    pub type_attr: Option<String>,
    /// Present iff this element is a member of a parent object.
    pub key: Option<String>,
    /// Present iff this element is a scalar leaf.
    pub value: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    /// A bare `ITEM` element carrying only a `type` attribute.
    pub fn new(type_attr: impl Into<String>) -> Self {
        Element {
            name: ELEMENT_NAME.to_string(),
            type_attr: Some(type_attr.into()),
            key: None,
            value: None,
            children: Vec::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Nesting depth of the subtree rooted here (a lone element has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Element::depth).max().unwrap_or(0)
    }
}
