//! Selection and range editing.
//!
//! Boundary points follow DOM semantics: the offset counts characters inside a
//! text node and children inside an element. Range operations validate both
//! boundaries before touching the tree, so a failed call leaves the document
//! unchanged.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::document::Document;
use super::node::{char_to_byte, NodeId};

/// A position in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// The document's active selection. `anchor` is where it started, `focus`
/// where it ends; either may come first in tree order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: BoundaryPoint,
    pub focus: BoundaryPoint,
}

impl Selection {
    pub fn new(anchor: BoundaryPoint, focus: BoundaryPoint) -> Self {
        Self { anchor, focus }
    }

    /// A caret: anchor and focus at the same point.
    pub fn collapsed(point: BoundaryPoint) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Tree-ordered pair of boundary points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("boundary node {0} is not attached to the document")]
    DetachedBoundary(NodeId),

    #[error("offset {offset} is out of bounds for node {node} (length {length})")]
    OffsetOutOfBounds {
        node: NodeId,
        offset: usize,
        length: usize,
    },

    #[error("node {0} cannot hold a boundary point")]
    NotAContainer(NodeId),
}

/// Position relative to a node, stable across text splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Before(NodeId),
    EndOf(NodeId),
}

/// Pre-order numbering used to compare positions.
struct TreeOrder {
    pre: HashMap<NodeId, usize>,
    last: HashMap<NodeId, usize>,
    depth: HashMap<NodeId, usize>,
}

impl TreeOrder {
    fn build(doc: &Document) -> Self {
        let mut order = Self {
            pre: HashMap::new(),
            last: HashMap::new(),
            depth: HashMap::new(),
        };
        let mut counter = 0;
        order.visit(doc, doc.root(), 0, &mut counter);
        order
    }

    fn visit(&mut self, doc: &Document, id: NodeId, depth: usize, counter: &mut usize) {
        self.pre.insert(id, *counter);
        self.depth.insert(id, depth);
        *counter += 1;
        for &child in doc.children(id) {
            self.visit(doc, child, depth + 1, counter);
        }
        self.last.insert(id, *counter - 1);
    }

    /// Sort key of a position. End-of-container positions of nested elements
    /// share a major key; deeper containers sort first.
    fn key(&self, anchor: Anchor) -> (usize, usize) {
        match anchor {
            Anchor::Before(n) => (4 * self.pre[&n], 0),
            Anchor::EndOf(c) => (4 * self.last[&c] + 2, usize::MAX - self.depth[&c]),
        }
    }
}

impl Document {
    fn validate_point(&self, point: BoundaryPoint) -> Result<(), RangeError> {
        if !self.is_connected(point.node) {
            return Err(RangeError::DetachedBoundary(point.node));
        }
        if self.element(point.node).is_some_and(|el| el.is_void()) {
            return Err(RangeError::NotAContainer(point.node));
        }
        let length = self.node_length(point.node);
        if point.offset > length {
            return Err(RangeError::OffsetOutOfBounds {
                node: point.node,
                offset: point.offset,
                length,
            });
        }
        Ok(())
    }

    /// Tree order of two valid boundary points.
    pub fn compare_points(&self, a: BoundaryPoint, b: BoundaryPoint) -> Result<Ordering, RangeError> {
        self.validate_point(a)?;
        self.validate_point(b)?;
        let order = TreeOrder::build(self);
        Ok(self.point_key(&order, a).cmp(&self.point_key(&order, b)))
    }

    fn point_key(&self, order: &TreeOrder, point: BoundaryPoint) -> (usize, usize, usize) {
        if self.is_text(point.node) {
            return (4 * order.pre[&point.node] + 1, point.offset, 0);
        }
        let (major, minor) = order.key(self.anchor_for(point.node, point.offset));
        (major, minor, 0)
    }

    fn anchor_for(&self, container: NodeId, index: usize) -> Anchor {
        match self.children(container).get(index) {
            Some(&child) => Anchor::Before(child),
            None => Anchor::EndOf(container),
        }
    }

    fn anchor_after(&self, node: NodeId) -> Anchor {
        match (self.parent(node), self.index_in_parent(node)) {
            (Some(parent), Some(index)) => self.anchor_for(parent, index + 1),
            _ => Anchor::EndOf(node),
        }
    }

    /// Build a tree-ordered range from a selection, validating both ends.
    pub fn range_from_selection(&self, selection: &Selection) -> Result<Range, RangeError> {
        let (a, b) = (selection.anchor, selection.focus);
        match self.compare_points(a, b)? {
            Ordering::Greater => Ok(Range { start: b, end: a }),
            _ => Ok(Range { start: a, end: b }),
        }
    }

    /// Split text node `id` at character `offset`; the tail becomes a new
    /// sibling inserted right after it.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId, RangeError> {
        let text = self.text(id).ok_or(RangeError::NotAContainer(id))?.to_string();
        let length = text.chars().count();
        if offset > length {
            return Err(RangeError::OffsetOutOfBounds {
                node: id,
                offset,
                length,
            });
        }
        let parent = self.parent(id).ok_or(RangeError::DetachedBoundary(id))?;
        let index = self.index_in_parent(id).ok_or(RangeError::DetachedBoundary(id))?;

        let at = char_to_byte(&text, offset);
        let tail = self.create_text(&text[at..]);
        self.set_text(id, text[..at].to_string());
        self.insert_children_at(parent, index + 1, &[tail]);
        Ok(tail)
    }

    /// Turn a point into a position between children, splitting a text node
    /// when the point falls strictly inside it.
    fn normalize_point(&mut self, point: BoundaryPoint) -> Result<Anchor, RangeError> {
        if !self.is_text(point.node) {
            return Ok(self.anchor_for(point.node, point.offset));
        }
        let length = self.node_length(point.node);
        if point.offset == 0 {
            Ok(Anchor::Before(point.node))
        } else if point.offset >= length {
            Ok(self.anchor_after(point.node))
        } else {
            Ok(Anchor::Before(self.split_text(point.node, point.offset)?))
        }
    }

    /// Remove everything between the range boundaries and return the
    /// collapsed point (always inside an element) where the range now sits.
    pub fn delete_contents(&mut self, range: &Range) -> Result<BoundaryPoint, RangeError> {
        self.validate_point(range.start)?;
        self.validate_point(range.end)?;

        // End first: splitting it never moves the start position.
        let end = self.normalize_point(range.end)?;
        let start = self.normalize_point(range.start)?;

        let order = TreeOrder::build(self);
        let (start_key, end_key) = (order.key(start), order.key(end));

        let mut doomed = Vec::new();
        let mut stack: Vec<NodeId> = self.children(self.root()).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            let before = order.key(Anchor::Before(node));
            let after = order.key(self.anchor_after(node));
            if start_key <= before && after <= end_key && start_key < end_key {
                doomed.push(node);
            } else {
                stack.extend(self.children(node).iter().rev());
            }
        }

        let collapsed = match start {
            Anchor::Before(node) => {
                let parent = self.parent(node).ok_or(RangeError::DetachedBoundary(node))?;
                let index = self.index_in_parent(node).unwrap_or(0);
                BoundaryPoint::new(parent, index)
            }
            Anchor::EndOf(container) => BoundaryPoint::new(container, usize::MAX),
        };

        let removed: HashSet<NodeId> = doomed.iter().copied().collect();
        for node in doomed {
            self.remove(node);
        }
        debug_assert!(!removed.contains(&collapsed.node));

        let offset = collapsed.offset.min(self.children(collapsed.node).len());
        Ok(BoundaryPoint::new(collapsed.node, offset))
    }

    /// Insert `nodes` at an element boundary point; returns the point just
    /// after the inserted nodes.
    pub fn insert_nodes(&mut self, point: BoundaryPoint, nodes: &[NodeId]) -> Result<BoundaryPoint, RangeError> {
        if self.is_text(point.node) {
            return Err(RangeError::NotAContainer(point.node));
        }
        self.validate_point(point)?;
        self.insert_children_at(point.node, point.offset, nodes);
        Ok(BoundaryPoint::new(point.node, point.offset + nodes.len()))
    }
}

#[cfg(test)]
#[path = "range_tests.rs"]
mod tests;
