//! Declarative probe table: provider → ordered selector probes.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::dom::{Document, NodeId, Selector, SelectorError};
use crate::page::ProviderIdentity;

/// What a probe looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    Editor,
    Reply,
    Compose,
    Thread,
}

impl ProbeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::Reply => "reply",
            Self::Compose => "compose",
            Self::Thread => "thread",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named selector query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    name: String,
    selector: Selector,
}

impl Probe {
    /// Parse `selector` into a probe named `<scope>:<selector>`.
    pub fn new(scope: &str, selector: &str) -> Result<Self, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(Self {
            name: format!("{scope}:{selector}"),
            selector,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Matching elements in document order.
    pub fn query(&self, doc: &Document) -> Vec<NodeId> {
        doc.query_selector_all(&self.selector)
    }
}

/// Ordered probe lists for one provider (or the generic fallback).
#[derive(Debug, Clone, Default)]
pub struct ProviderProbes {
    pub editors: Vec<Probe>,
    pub replies: Vec<Probe>,
    pub composes: Vec<Probe>,
    pub threads: Vec<Probe>,
}

impl ProviderProbes {
    pub fn list(&self, kind: ProbeKind) -> &[Probe] {
        match kind {
            ProbeKind::Editor => &self.editors,
            ProbeKind::Reply => &self.replies,
            ProbeKind::Compose => &self.composes,
            ProbeKind::Thread => &self.threads,
        }
    }

    fn list_mut(&mut self, kind: ProbeKind) -> &mut Vec<Probe> {
        match kind {
            ProbeKind::Editor => &mut self.editors,
            ProbeKind::Reply => &mut self.replies,
            ProbeKind::Compose => &mut self.composes,
            ProbeKind::Thread => &mut self.threads,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
            && self.replies.is_empty()
            && self.composes.is_empty()
            && self.threads.is_empty()
    }
}

const GENERIC_SCOPE: &str = "generic";

static BUILTIN: Lazy<ProbeTable> = Lazy::new(|| {
    let mut table = ProbeTable::empty();
    table.prepend(
        Some(ProviderIdentity::Gmail),
        ProbeKind::Editor,
        &[
            r#"div[aria-label="Message Body"]"#,
            r#"div[role="textbox"][aria-label*="Message"]"#,
            ".Am.Al.editable",
        ],
    );
    table.prepend(
        Some(ProviderIdentity::Gmail),
        ProbeKind::Reply,
        &[r#"div[role="button"][data-tooltip="Reply"]"#, "span.ams.bkH"],
    );
    table.prepend(
        Some(ProviderIdentity::Gmail),
        ProbeKind::Compose,
        &["div.T-I.T-I-KE.L3", r#"div[role="button"][gh="cm"]"#],
    );
    table.prepend(
        Some(ProviderIdentity::Gmail),
        ProbeKind::Thread,
        &[".a3s", ".gmail_quote", "div.a3s.aiL"],
    );

    table.prepend(
        Some(ProviderIdentity::OutlookWeb),
        ProbeKind::Editor,
        &[
            r#"div[aria-label*="Message body"]"#,
            r#"[contenteditable="true"][aria-label*="Message"]"#,
        ],
    );
    table.prepend(
        Some(ProviderIdentity::OutlookWeb),
        ProbeKind::Reply,
        &[r#"button[aria-label="Reply"]"#],
    );
    table.prepend(
        Some(ProviderIdentity::OutlookWeb),
        ProbeKind::Compose,
        &[r#"button[aria-label="New mail"]"#, r#"button[aria-label="New message"]"#],
    );
    table.prepend(
        Some(ProviderIdentity::OutlookWeb),
        ProbeKind::Thread,
        &[r#"[aria-label="Message body"]"#, ".ms-MessageBody-content"],
    );

    table.prepend(
        Some(ProviderIdentity::YahooMail),
        ProbeKind::Editor,
        &[r#"[aria-label="Message body"]"#, r#"[contenteditable="true"].msg-body"#],
    );
    table.prepend(
        Some(ProviderIdentity::YahooMail),
        ProbeKind::Reply,
        &[r#"button[data-test-id="message-toolbar-reply"]"#, r#"[aria-label="Reply"]"#],
    );
    table.prepend(
        Some(ProviderIdentity::YahooMail),
        ProbeKind::Compose,
        &[r#"a[data-test-id="compose-button"]"#],
    );
    table.prepend(
        Some(ProviderIdentity::YahooMail),
        ProbeKind::Thread,
        &[".thread-body", ".mail-message-content"],
    );

    table.prepend(None, ProbeKind::Thread, &[r#"[role="article"]"#, "article"]);
    table
});

/// Probe lists for every known provider plus the generic fallback.
#[derive(Debug, Clone)]
pub struct ProbeTable {
    providers: HashMap<ProviderIdentity, ProviderProbes>,
    generic: ProviderProbes,
}

impl Default for ProbeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProbeTable {
    /// The built-in table for Gmail, Outlook on the web and Yahoo Mail.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// A table with no probes at all.
    pub fn empty() -> Self {
        Self {
            providers: HashMap::new(),
            generic: ProviderProbes::default(),
        }
    }

    /// Probes for `provider`; `None` for [`ProviderIdentity::Unknown`].
    pub fn provider(&self, provider: ProviderIdentity) -> Option<&ProviderProbes> {
        if !provider.is_known() {
            return None;
        }
        self.providers.get(&provider)
    }

    /// Provider-independent probes, tried after the provider's own.
    pub fn generic(&self) -> &ProviderProbes {
        &self.generic
    }

    /// Provider probes of `kind` followed by generic probes of `kind`.
    pub fn ordered(&self, provider: ProviderIdentity, kind: ProbeKind) -> impl Iterator<Item = &Probe> {
        self.provider(provider)
            .map(|p| p.list(kind))
            .unwrap_or(&[])
            .iter()
            .chain(self.generic.list(kind))
    }

    /// Put `selectors` ahead of the existing `kind` probes of `provider`
    /// (`None` targets the generic list), keeping their relative order.
    /// Invalid selectors are skipped with a warning. Returns how many were
    /// added.
    pub fn prepend<S: AsRef<str>>(
        &mut self,
        provider: Option<ProviderIdentity>,
        kind: ProbeKind,
        selectors: &[S],
    ) -> usize {
        let scope = provider.map_or(GENERIC_SCOPE, ProviderIdentity::as_str);
        let parsed: Vec<Probe> = selectors
            .iter()
            .filter_map(|s| match Probe::new(scope, s.as_ref()) {
                Ok(probe) => Some(probe),
                Err(e) => {
                    warn!(scope, kind = %kind, selector = s.as_ref(), error = %e, "Skipping invalid probe selector");
                    None
                }
            })
            .collect();
        let added = parsed.len();

        let probes = match provider {
            Some(p) if p.is_known() => self.providers.entry(p).or_default(),
            Some(_) => {
                warn!(kind = %kind, "Probes for an unknown provider go to the generic list");
                &mut self.generic
            }
            None => &mut self.generic,
        };
        let list = probes.list_mut(kind);
        list.splice(0..0, parsed);
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(probes: &[Probe]) -> Vec<&str> {
        probes.iter().map(Probe::name).collect()
    }

    #[test]
    fn test_builtin_gmail_editors_in_priority_order() {
        let table = ProbeTable::builtin();
        let gmail = table.provider(ProviderIdentity::Gmail).unwrap();
        assert_eq!(
            names(&gmail.editors),
            [
                r#"gmail:div[aria-label="Message Body"]"#,
                r#"gmail:div[role="textbox"][aria-label*="Message"]"#,
                "gmail:.Am.Al.editable",
            ]
        );
    }

    #[test]
    fn test_builtin_covers_every_known_provider() {
        let table = ProbeTable::builtin();
        for provider in ProviderIdentity::KNOWN {
            let probes = table.provider(provider).unwrap();
            assert!(!probes.editors.is_empty(), "{provider} editors");
            assert!(!probes.replies.is_empty(), "{provider} replies");
            assert!(!probes.composes.is_empty(), "{provider} composes");
            assert!(!probes.threads.is_empty(), "{provider} threads");
        }
        assert!(table.provider(ProviderIdentity::Unknown).is_none());
        assert_eq!(names(&table.generic().threads), [r#"generic:[role="article"]"#, "generic:article"]);
        assert!(table.generic().editors.is_empty());
    }

    #[test]
    fn test_prepend_keeps_order_and_skips_invalid() {
        let mut table = ProbeTable::builtin();
        let added = table.prepend(
            Some(ProviderIdentity::OutlookWeb),
            ProbeKind::Editor,
            &["#custom-one", "div[", ".custom-two"],
        );
        assert_eq!(added, 2);
        let editors = &table.provider(ProviderIdentity::OutlookWeb).unwrap().editors;
        assert_eq!(editors[0].name(), "outlook:#custom-one");
        assert_eq!(editors[1].name(), "outlook:.custom-two");
        assert_eq!(editors.len(), 4);
    }

    #[test]
    fn test_ordered_chains_generic_after_provider() {
        let mut table = ProbeTable::builtin();
        table.prepend(None, ProbeKind::Editor, &[".fallback-editor"]);

        let gmail: Vec<&str> = table
            .ordered(ProviderIdentity::Gmail, ProbeKind::Editor)
            .map(Probe::name)
            .collect();
        assert_eq!(gmail.len(), 4);
        assert_eq!(gmail[3], "generic:.fallback-editor");

        let unknown: Vec<&str> = table
            .ordered(ProviderIdentity::Unknown, ProbeKind::Editor)
            .map(Probe::name)
            .collect();
        assert_eq!(unknown, ["generic:.fallback-editor"]);
    }

    #[test]
    fn test_probe_query() {
        let doc = Document::parse_html(r#"<div class="a3s">one</div><div class="a3s aiL">two</div>"#);
        let probe = Probe::new("gmail", ".a3s").unwrap();
        assert_eq!(probe.query(&doc).len(), 2);
        assert_eq!(probe.selector().as_str(), ".a3s");
    }

    #[test]
    fn test_empty_table() {
        let table = ProbeTable::empty();
        assert!(table.generic().is_empty());
        assert!(table.provider(ProviderIdentity::Gmail).is_none());
    }
}
