//! Text insertion that looks like typing to the host page.
//!
//! Form fields get a `setRangeText`-style replacement followed by `input` and
//! `change`. Rich-text regions get either a caret insertion (text runs
//! separated by `<br>`) or, when the caret is elsewhere, an appended block of
//! escaped markup. If the selection cannot be turned into a usable range the
//! text is appended as plain trailing text. Every successful write ends with
//! an `input` event.

use thiserror::Error;
use tracing::{debug, warn};

use crate::dom::{BoundaryPoint, Document, ElementRef, EventKind, NodeId, RangeError, Selection};
use crate::locator::{surface_kind, EditableSurface, SurfaceKind};

/// Where inserted text goes relative to the existing content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertMode {
    /// Replace the current selection when it lies inside the surface.
    #[default]
    CaretAware,
    /// Always add after the existing content.
    AppendOnly,
}

/// Text to insert and how. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionRequest {
    text: String,
    mode: InsertMode,
}

impl InsertionRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: InsertMode::CaretAware,
        }
    }

    pub fn append_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: InsertMode::AppendOnly,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> InsertMode {
        self.mode
    }
}

/// How the text ended up in the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPath {
    /// Form field selection (or end of value) replaced.
    FieldRange,
    /// Rich-text selection replaced by text runs and line breaks.
    CaretFragment,
    /// Escaped `<div>` block appended to the rich-text region.
    AppendedBlock,
    /// Selection handling failed; raw text appended instead.
    PlainFallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectError {
    #[error("target element {0:?} is no longer in the document")]
    SurfaceDetached(ElementRef),

    #[error("target frame is not accessible")]
    FrameNotAccessible,

    #[error("target element {0:?} does not accept text")]
    NotWritable(ElementRef),
}

/// `\r\n` and lone `\r` become `\n`.
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Writes text into located surfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextInjector;

impl TextInjector {
    pub fn new() -> Self {
        Self
    }

    /// Insert `request` into `surface`. Errors leave the document untouched
    /// and dispatch nothing.
    pub fn inject(
        &self,
        doc: &mut Document,
        surface: &EditableSurface,
        request: &InsertionRequest,
    ) -> Result<InsertPath, InjectError> {
        let target = surface.element;
        let scope = doc
            .scope_mut(target.frame)
            .ok_or(InjectError::FrameNotAccessible)?;
        if !scope.is_connected(target.node) || !scope.is_element(target.node) {
            return Err(InjectError::SurfaceDetached(target));
        }
        let kind = surface_kind(scope, target.node).ok_or(InjectError::NotWritable(target))?;
        let text = normalize_line_breaks(request.text());

        scope.focus(target.node);
        let path = match kind {
            SurfaceKind::TextField | SurfaceKind::TextArea => {
                write_field(scope, target.node, kind, &text, request.mode())
            }
            SurfaceKind::RichText => write_rich_text(scope, target.node, &text, request.mode()),
        };
        debug!(element = ?target, ?kind, ?path, chars = text.chars().count(), "Text injected");
        Ok(path)
    }
}

fn write_field(doc: &mut Document, node: NodeId, kind: SurfaceKind, text: &str, mode: InsertMode) -> InsertPath {
    // Single-line values cannot hold line breaks.
    let text = if kind.is_multiline() {
        text.to_string()
    } else {
        text.replace('\n', "")
    };
    if let Some(field) = doc.field_mut(node) {
        let len = field.char_len();
        let (start, end) = match (mode, field.selection) {
            (InsertMode::CaretAware, Some(range)) => range,
            _ => (len, len),
        };
        field.set_range_text(&text, start, end);
    }
    doc.dispatch(node, EventKind::Input);
    doc.dispatch(node, EventKind::Change);
    InsertPath::FieldRange
}

fn write_rich_text(doc: &mut Document, host: NodeId, text: &str, mode: InsertMode) -> InsertPath {
    let caret = match mode {
        InsertMode::CaretAware => doc
            .selection()
            .copied()
            .filter(|sel| doc.contains(host, sel.anchor.node) && doc.contains(host, sel.focus.node)),
        InsertMode::AppendOnly => None,
    };

    let path = match caret {
        Some(selection) => match insert_at_selection(doc, &selection, text) {
            Ok(()) => InsertPath::CaretFragment,
            Err(e) => {
                warn!(error = %e, "Selection unusable, appending plain text");
                append_plain(doc, host, text);
                InsertPath::PlainFallback
            }
        },
        None => {
            let markup = format!("<div>{}</div>", html_escape::encode_safe(text).replace('\n', "<br>"));
            doc.append_markup(host, &markup);
            InsertPath::AppendedBlock
        }
    };
    doc.dispatch(host, EventKind::Input);
    path
}

/// Replace the selected range with text runs separated by `<br>` and collapse
/// the selection after them.
fn insert_at_selection(doc: &mut Document, selection: &Selection, text: &str) -> Result<(), RangeError> {
    let range = doc.range_from_selection(selection)?;
    let point = doc.delete_contents(&range)?;

    let lines: Vec<&str> = text.split('\n').collect();
    let mut nodes = Vec::with_capacity(lines.len() * 2);
    for (i, line) in lines.iter().enumerate() {
        nodes.push(doc.create_text(*line));
        if i + 1 < lines.len() {
            nodes.push(doc.create_element("br"));
        }
    }

    let after: BoundaryPoint = doc.insert_nodes(point, &nodes)?;
    doc.set_selection(Selection::collapsed(after));
    Ok(())
}

/// Last-resort write: the raw text as a trailing text node, on its own line
/// when the region already has content.
fn append_plain(doc: &mut Document, host: NodeId, text: &str) {
    let content = if doc.text_content(host).is_empty() {
        text.to_string()
    } else {
        format!("\n{text}")
    };
    let node = doc.create_text(content);
    doc.append_child(host, node);
}

#[cfg(test)]
#[path = "injector_tests.rs"]
mod tests;
