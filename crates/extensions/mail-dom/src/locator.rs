//! Editor location: which element should receive inserted text.
//!
//! Probes run in priority order and the first writable match wins:
//!
//! 1. provider probes, most specific markup first;
//! 2. the body of every same-origin iframe (cross-origin frames are skipped);
//! 3. the focused element;
//! 4. generic probes, then the first visible editing host in the page.
//!
//! The locator only reads the document.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::dom::{Document, ElementRef, FrameAccess, NodeId};
use crate::page::ProviderIdentity;
use crate::probes::{Probe, ProbeKind, ProbeTable};

/// Input types that accept free text.
const TEXT_INPUT_TYPES: &[&str] = &["text", "search", "email"];

/// Capability of an editable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// Single-line `<input>`.
    TextField,
    /// Multi-line `<textarea>`.
    TextArea,
    /// `contenteditable` region or design-mode document.
    RichText,
}

impl SurfaceKind {
    pub fn is_rich_text(self) -> bool {
        self == Self::RichText
    }

    pub fn is_multiline(self) -> bool {
        self != Self::TextField
    }
}

/// A writable element and what it can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditableSurface {
    pub element: ElementRef,
    pub kind: SurfaceKind,
}

/// Writability check: an editable region, a `<textarea>`, or an `<input>`
/// whose type is text, search or email. Disabled and read-only fields do not
/// qualify.
pub fn surface_kind(doc: &Document, id: NodeId) -> Option<SurfaceKind> {
    let el = doc.element(id)?;
    let locked = el.has_attr("disabled") || el.has_attr("readonly");
    match el.tag() {
        "textarea" => (!locked).then_some(SurfaceKind::TextArea),
        "input" => {
            let ty = el.input_type()?;
            (!locked && TEXT_INPUT_TYPES.contains(&ty.as_str())).then_some(SurfaceKind::TextField)
        }
        _ => doc.is_content_editable(id).then_some(SurfaceKind::RichText),
    }
}

pub fn is_writable(doc: &Document, id: NodeId) -> bool {
    surface_kind(doc, id).is_some()
}

/// Result of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Matched(EditableSurface),
    /// The probe targeted a document the page may not script.
    NotAccessible { origin: String },
    NotFound,
}

/// A located surface and the probe that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Located {
    pub surface: EditableSurface,
    pub probe: String,
}

/// Every probe came up empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no editable surface found ({probes_tried} probes tried)")]
pub struct NotFound {
    pub probes_tried: usize,
    /// Origins of cross-origin iframes that could not be searched.
    pub inaccessible_frames: Vec<String>,
}

/// Runs the probe cascade over a document.
#[derive(Debug, Clone)]
pub struct EditorLocator {
    probes: Arc<ProbeTable>,
}

impl Default for EditorLocator {
    fn default() -> Self {
        Self::new(Arc::new(ProbeTable::builtin()))
    }
}

impl EditorLocator {
    pub fn new(probes: Arc<ProbeTable>) -> Self {
        Self { probes }
    }

    pub fn probes(&self) -> &ProbeTable {
        &self.probes
    }

    /// Find the surface that should receive text on a page served by
    /// `provider`.
    pub fn locate(&self, doc: &Document, provider: ProviderIdentity) -> Result<Located, NotFound> {
        let mut tried = 0;
        let mut inaccessible = Vec::new();

        if let Some(probes) = self.probes.provider(provider) {
            for probe in &probes.editors {
                tried += 1;
                if let ProbeOutcome::Matched(surface) = run_selector_probe(doc, probe) {
                    return Ok(found(surface, probe.name()));
                }
            }
        }

        for iframe in doc.iframes() {
            tried += 1;
            match frame_body_probe(doc, iframe) {
                ProbeOutcome::Matched(surface) => return Ok(found(surface, "iframe:body")),
                ProbeOutcome::NotAccessible { origin } => {
                    debug!(%iframe, %origin, "Skipping cross-origin iframe");
                    inaccessible.push(origin);
                }
                ProbeOutcome::NotFound => {}
            }
        }

        tried += 1;
        if let ProbeOutcome::Matched(surface) = focused_probe(doc) {
            return Ok(found(surface, "focused"));
        }

        for probe in &self.probes.generic().editors {
            tried += 1;
            if let ProbeOutcome::Matched(surface) = run_selector_probe(doc, probe) {
                return Ok(found(surface, probe.name()));
            }
        }

        tried += 1;
        if let ProbeOutcome::Matched(surface) = any_editable_probe(doc) {
            return Ok(found(surface, "generic:editing-host"));
        }

        if !inaccessible.is_empty() {
            warn!(
                frames = inaccessible.len(),
                "Editor not found; some iframes were cross-origin and could not be searched"
            );
        }
        debug!(%provider, probes = tried, "No editable surface found");
        Err(NotFound {
            probes_tried: tried,
            inaccessible_frames: inaccessible,
        })
    }

    /// First visible element matched by the `kind` probes of `provider`
    /// (then generic), in the top-level document.
    pub fn find_affordance(
        &self,
        doc: &Document,
        provider: ProviderIdentity,
        kind: ProbeKind,
        require_visible: bool,
    ) -> Option<(NodeId, String)> {
        self.probes.ordered(provider, kind).find_map(|probe| {
            let hit = probe
                .query(doc)
                .into_iter()
                .find(|&id| !require_visible || doc.is_visible(id));
            debug!(probe = probe.name(), matched = hit.is_some(), "Affordance probe");
            hit.map(|id| (id, probe.name().to_string()))
        })
    }
}

fn found(surface: EditableSurface, probe: &str) -> Located {
    debug!(probe, element = ?surface.element, kind = ?surface.kind, "Editor located");
    Located {
        surface,
        probe: probe.to_string(),
    }
}

/// First writable element matched by a selector probe.
pub fn run_selector_probe(doc: &Document, probe: &Probe) -> ProbeOutcome {
    let hit = probe
        .query(doc)
        .into_iter()
        .find_map(|id| surface_kind(doc, id).map(|kind| (id, kind)));
    debug!(probe = probe.name(), matched = hit.is_some(), "Editor probe");
    match hit {
        Some((id, kind)) => ProbeOutcome::Matched(EditableSurface {
            element: ElementRef::top(id),
            kind,
        }),
        None => ProbeOutcome::NotFound,
    }
}

/// The body of a same-origin iframe, if it is an editable region.
pub fn frame_body_probe(doc: &Document, iframe: NodeId) -> ProbeOutcome {
    match doc.frame(iframe) {
        FrameAccess::Accessible(inner) => {
            let Some(body) = inner.body() else {
                return ProbeOutcome::NotFound;
            };
            match surface_kind(inner, body) {
                Some(kind) => ProbeOutcome::Matched(EditableSurface {
                    element: ElementRef::in_frame(iframe, body),
                    kind,
                }),
                None => ProbeOutcome::NotFound,
            }
        }
        FrameAccess::NotAccessible { origin } => ProbeOutcome::NotAccessible {
            origin: origin.to_string(),
        },
        FrameAccess::NoDocument => ProbeOutcome::NotFound,
    }
}

/// The document's active element, if writable.
pub fn focused_probe(doc: &Document) -> ProbeOutcome {
    doc.active_element()
        .and_then(|id| surface_kind(doc, id).map(|kind| (id, kind)))
        .map_or(ProbeOutcome::NotFound, |(id, kind)| {
            ProbeOutcome::Matched(EditableSurface {
                element: ElementRef::top(id),
                kind,
            })
        })
}

/// First visible editing host in document order (the body of a design-mode
/// document). Form fields are left out: every webmail page has a search box
/// that must not receive a reply.
pub fn any_editable_probe(doc: &Document) -> ProbeOutcome {
    doc.elements()
        .into_iter()
        .find(|&id| {
            let host = match doc.tag(id) {
                Some("html") => false,
                Some("body") if doc.design_mode() => true,
                _ => doc.is_editing_host(id),
            };
            host && doc.is_visible(id)
        })
        .map_or(ProbeOutcome::NotFound, |id| {
            ProbeOutcome::Matched(EditableSurface {
                element: ElementRef::top(id),
                kind: SurfaceKind::RichText,
            })
        })
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
