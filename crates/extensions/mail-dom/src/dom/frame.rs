//! Iframe contents and cross-document element references.

use serde::Serialize;

use super::document::Document;
use super::node::NodeId;

/// What an `<iframe>` element has loaded.
#[derive(Debug, Clone)]
pub enum FrameContent {
    /// Same-origin document the page (and therefore the engine) may script.
    SameOrigin(Box<Document>),
    /// Document from another origin; its tree is opaque.
    CrossOrigin { origin: String },
}

impl FrameContent {
    pub fn same_origin(doc: Document) -> Self {
        Self::SameOrigin(Box::new(doc))
    }

    pub fn cross_origin(origin: impl Into<String>) -> Self {
        Self::CrossOrigin {
            origin: origin.into(),
        }
    }
}

/// Result of reaching into an iframe.
#[derive(Debug, Clone, Copy)]
pub enum FrameAccess<'a> {
    Accessible(&'a Document),
    NotAccessible { origin: &'a str },
    NoDocument,
}

/// Address of an element in the top-level document or in one of its
/// same-origin iframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ElementRef {
    /// `<iframe>` element (in the top-level document) holding the element.
    pub frame: Option<NodeId>,
    pub node: NodeId,
}

impl ElementRef {
    pub fn top(node: NodeId) -> Self {
        Self { frame: None, node }
    }

    pub fn in_frame(frame: NodeId, node: NodeId) -> Self {
        Self {
            frame: Some(frame),
            node,
        }
    }
}

impl Document {
    /// The document owning elements addressed through `frame`.
    pub fn scope(&self, frame: Option<NodeId>) -> Option<&Document> {
        match frame {
            None => Some(self),
            Some(iframe) => match self.frame(iframe) {
                FrameAccess::Accessible(doc) => Some(doc),
                _ => None,
            },
        }
    }

    pub fn scope_mut(&mut self, frame: Option<NodeId>) -> Option<&mut Document> {
        match frame {
            None => Some(self),
            Some(iframe) => self.frame_mut(iframe),
        }
    }

    /// Whether `target` still resolves to a connected element.
    pub fn resolves(&self, target: &ElementRef) -> bool {
        self.scope(target.frame)
            .is_some_and(|doc| doc.is_connected(target.node) && doc.is_element(target.node))
    }
}
