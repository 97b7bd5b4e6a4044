//! Arena node types: node IDs, elements, text and form-field state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a node inside its owning [`Document`](super::Document) arena.
///
/// IDs stay valid after a node is detached; detached nodes are simply no
/// longer reachable from the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Elements that never have children.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(crate) fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Live value and selection of an `<input>` or `<textarea>`.
///
/// Selection offsets count characters, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub selection: Option<(usize, usize)>,
}

impl FieldState {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            selection: None,
        }
    }

    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Replace characters `start..end` with `text` and leave the caret after
    /// the replacement. Out-of-range offsets are clamped to the value length.
    pub fn set_range_text(&mut self, text: &str, start: usize, end: usize) {
        let len = self.char_len();
        let (mut start, mut end) = (start.min(len), end.min(len));
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }

        let byte_start = char_to_byte(&self.value, start);
        let byte_end = char_to_byte(&self.value, end);
        self.value.replace_range(byte_start..byte_end, text);

        let caret = start + text.chars().count();
        self.selection = Some((caret, caret));
    }
}

pub(crate) fn char_to_byte(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}

/// Element tag, attributes and (for form fields) live field state.
#[derive(Debug, Clone)]
pub struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    pub(crate) field: Option<FieldState>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let field = matches!(tag.as_str(), "input" | "textarea").then(FieldState::default);
        Self {
            tag,
            attributes: Vec::new(),
            field,
        }
    }

    /// Lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        if name == "value" && self.tag == "input" {
            if let Some(field) = self.field.as_mut() {
                field.value = value.clone();
            }
        }
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn is_void(&self) -> bool {
        is_void_tag(&self.tag)
    }

    /// Effective `type` of an `<input>`: lowercase, `"text"` when missing or empty.
    pub fn input_type(&self) -> Option<String> {
        if self.tag != "input" {
            return None;
        }
        let ty = self.attr("type").map(str::trim).unwrap_or("");
        Some(if ty.is_empty() {
            "text".to_string()
        } else {
            ty.to_ascii_lowercase()
        })
    }

    pub fn field(&self) -> Option<&FieldState> {
        self.field.as_ref()
    }
}

/// Payload of an arena node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}
