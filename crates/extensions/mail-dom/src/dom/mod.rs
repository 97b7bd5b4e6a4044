//! In-memory page model the engine operates on.
//!
//! A [`Document`] is an arena of nodes with the subset of browser behavior
//! the editor tooling depends on: selectors, editability and visibility,
//! `innerText`, selections and ranges, form-field state, iframes and an
//! event log standing in for dispatched DOM events.

mod document;
mod frame;
mod markup;
mod node;
mod range;
mod selector;
mod snapshot;
mod text;

pub use document::{Document, DomEvent, EventKind};
pub use frame::{ElementRef, FrameAccess, FrameContent};
pub use node::{ElementData, FieldState, NodeData, NodeId};
pub use range::{BoundaryPoint, Range, RangeError, Selection};
pub use selector::{Selector, SelectorError};
pub use snapshot::{DomNode, PageSnapshot, SnapshotError};

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
