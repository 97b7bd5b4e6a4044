//! Incoming-thread reader: best-effort visible text of the open conversation.

use std::sync::Arc;

use tracing::debug;

use crate::dom::Document;
use crate::page::ProviderIdentity;
use crate::probes::{ProbeKind, ProbeTable};

#[derive(Debug, Clone)]
pub struct ThreadReader {
    probes: Arc<ProbeTable>,
}

impl Default for ThreadReader {
    fn default() -> Self {
        Self::new(Arc::new(ProbeTable::builtin()))
    }
}

impl ThreadReader {
    pub fn new(probes: Arc<ProbeTable>) -> Self {
        Self { probes }
    }

    /// Trimmed visible text of the first thread region with any text, trying
    /// provider probes before generic ones. Empty when nothing matches.
    pub fn read(&self, doc: &Document, provider: ProviderIdentity) -> String {
        for probe in self.probes.ordered(provider, ProbeKind::Thread) {
            let Some(region) = probe.query(doc).into_iter().next() else {
                continue;
            };
            let text = doc.inner_text(region);
            let text = text.trim();
            if text.is_empty() {
                debug!(probe = probe.name(), "Thread region has no visible text");
                continue;
            }
            debug!(probe = probe.name(), chars = text.chars().count(), "Thread text read");
            return text.to_string();
        }
        String::new()
    }
}
