//! Arena-backed document: tree structure, attributes, focus, frames and the
//! dispatched-event log.

use std::collections::HashMap;

use serde::Serialize;

use super::frame::{FrameAccess, FrameContent};
use super::node::{ElementData, FieldState, Node, NodeData, NodeId};
use super::range::Selection;

/// Notification dispatched on an element, as the host page would observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Focus,
    Click,
    Input,
    Change,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Click => "click",
            Self::Input => "input",
            Self::Change => "change",
        }
    }

    /// `focus` does not bubble; the others do.
    pub fn bubbles(self) -> bool {
        !matches!(self, Self::Focus)
    }
}

/// Entry in the document's event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: NodeId,
    pub bubbles: bool,
}

/// A single page or frame document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    active_element: Option<NodeId>,
    design_mode: bool,
    selection: Option<Selection>,
    frames: HashMap<NodeId, FrameContent>,
    events: Vec<DomEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Document with an empty `<html><head></head><body></body></html>` skeleton.
    pub fn new() -> Self {
        let mut doc = Self::empty();
        let html = doc.create_element("html");
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.append_child(doc.root, html);
        doc.append_child(html, head);
        doc.append_child(html, body);
        doc
    }

    /// Document with nothing but the root node.
    pub fn empty() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            root: NodeId(0),
            active_element: None,
            design_mode: false,
            selection: None,
            frames: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// First `<body>` element in document order.
    pub fn body(&self) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&id| self.tag(id) == Some("body"))
    }

    // ------------------------------------------------------------------
    // Node access
    // ------------------------------------------------------------------

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Whether `id` belongs to this document's arena.
    pub fn has_node(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.node(id).data
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.0)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.text(id).is_some()
    }

    pub(crate) fn set_text(&mut self, id: NodeId, value: String) {
        if let NodeData::Text(t) = &mut self.node_mut(id).data {
            *t = value;
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            el.set_attr(name, value);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    pub fn field(&self, id: NodeId) -> Option<&FieldState> {
        self.element(id)?.field.as_ref()
    }

    pub fn field_mut(&mut self, id: NodeId) -> Option<&mut FieldState> {
        self.element_mut(id)?.field.as_mut()
    }

    // ------------------------------------------------------------------
    // Tree structure
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Detach `id` from its current parent, if any.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&c| c != id);
            self.node_mut(id).parent = None;
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let at = self.children(parent).len();
        self.insert_children_at(parent, at, &[child]);
    }

    /// Insert `nodes` into `parent` starting at child index `index`.
    pub fn insert_children_at(&mut self, parent: NodeId, index: usize, nodes: &[NodeId]) {
        for &n in nodes {
            self.remove(n);
        }
        let index = index.min(self.children(parent).len());
        for (offset, &n) in nodes.iter().enumerate() {
            self.node_mut(n).parent = Some(parent);
            self.node_mut(parent).children.insert(index + offset, n);
        }
    }

    /// Whether `id` is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        if !self.has_node(id) {
            return false;
        }
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current == self.root
    }

    /// Inclusive containment: `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.has_node(node) {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Descendants of `id` in document (pre-)order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Every connected element, in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.is_element(id))
            .collect()
    }

    /// Number of characters (text) or children (element, document).
    pub fn node_length(&self, id: NodeId) -> usize {
        match self.data(id) {
            NodeData::Text(t) => t.chars().count(),
            _ => self.children(id).len(),
        }
    }

    // ------------------------------------------------------------------
    // Editing state
    // ------------------------------------------------------------------

    pub fn design_mode(&self) -> bool {
        self.design_mode
    }

    pub fn set_design_mode(&mut self, on: bool) {
        self.design_mode = on;
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element.filter(|&id| self.is_connected(id))
    }

    /// Move focus to `id` and dispatch `focus`.
    pub fn focus(&mut self, id: NodeId) {
        self.active_element = Some(id);
        self.dispatch(id, EventKind::Focus);
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------

    /// Attach the content of an `<iframe>` element.
    pub fn attach_frame(&mut self, iframe: NodeId, content: FrameContent) {
        self.frames.insert(iframe, content);
    }

    /// Access the document loaded in `iframe`.
    pub fn frame(&self, iframe: NodeId) -> FrameAccess<'_> {
        match self.frames.get(&iframe) {
            Some(FrameContent::SameOrigin(doc)) => FrameAccess::Accessible(doc),
            Some(FrameContent::CrossOrigin { origin }) => FrameAccess::NotAccessible { origin },
            None => FrameAccess::NoDocument,
        }
    }

    /// Mutable access to a same-origin frame document.
    pub fn frame_mut(&mut self, iframe: NodeId) -> Option<&mut Document> {
        match self.frames.get_mut(&iframe) {
            Some(FrameContent::SameOrigin(doc)) => Some(doc),
            _ => None,
        }
    }

    /// Connected `<iframe>` elements in document order.
    pub fn iframes(&self) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|&id| self.tag(id) == Some("iframe"))
            .collect()
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn dispatch(&mut self, target: NodeId, kind: EventKind) {
        self.events.push(DomEvent {
            kind,
            target,
            bubbles: kind.bubbles(),
        });
    }

    pub fn events(&self) -> &[DomEvent] {
        &self.events
    }

    pub fn events_of(&self, kind: EventKind) -> Vec<DomEvent> {
        self.events.iter().filter(|e| e.kind == kind).copied().collect()
    }

    pub fn take_events(&mut self) -> Vec<DomEvent> {
        std::mem::take(&mut self.events)
    }
}
