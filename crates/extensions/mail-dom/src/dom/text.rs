//! Rendering-derived queries: editability, visibility and visible text.

use super::document::Document;
use super::node::{NodeData, NodeId};

/// Elements rendered as their own block (a line break before and after).
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "dialog", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Elements whose content is never rendered as text.
const NON_RENDERED_TAGS: &[&str] = &[
    "head", "script", "style", "template", "noscript", "iframe", "input", "textarea", "select",
];

impl Document {
    /// Whether `id` is inside an editing host (`contenteditable` inheritance,
    /// or the whole document in design mode).
    pub fn is_content_editable(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(el) = self.element(node) {
                match el.attr("contenteditable").map(|v| v.trim().to_ascii_lowercase()) {
                    Some(v) if v.is_empty() || v == "true" || v == "plaintext-only" => return true,
                    Some(v) if v == "false" => return false,
                    _ => {}
                }
            }
            current = self.parent(node);
        }
        self.design_mode() && self.is_connected(id)
    }

    /// Whether `id` is the outermost element of an editable region.
    pub fn is_editing_host(&self, id: NodeId) -> bool {
        if !self.is_element(id) || !self.is_content_editable(id) {
            return false;
        }
        match self.parent(id) {
            Some(parent) if self.is_element(parent) => !self.is_content_editable(parent),
            _ => true,
        }
    }

    /// Whether `id` and all its ancestors are rendered.
    pub fn is_visible(&self, id: NodeId) -> bool {
        if !self.is_connected(id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(node) = current {
            if self.is_element(node) && self.hides_subtree(node) {
                return false;
            }
            current = self.parent(node);
        }
        true
    }

    fn hides_subtree(&self, id: NodeId) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };
        if el.has_attr("hidden") || el.attr("aria-hidden") == Some("true") {
            return true;
        }
        if el.input_type().as_deref() == Some("hidden") {
            return true;
        }
        el.attr("style").is_some_and(style_hides)
    }

    /// Concatenation of every descendant text node.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(t) = self.text(id) {
            out.push_str(t);
        }
        for node in self.descendants(id) {
            if let Some(t) = self.text(node) {
                out.push_str(t);
            }
        }
        out
    }

    /// Approximation of the browser's `innerText`: rendered text with `<br>`
    /// and block boundaries as line breaks. Whitespace collapses except inside
    /// editable regions and `<pre>`. A hidden root yields `""`.
    pub fn inner_text(&self, id: NodeId) -> String {
        if !self.has_node(id) || (self.is_element(id) && self.hides_subtree(id)) {
            return String::new();
        }
        let mut sink = TextSink::default();
        match self.data(id) {
            NodeData::Text(t) => sink.push_text(t, self.preserves_whitespace(id)),
            _ => self.collect_text(id, &mut sink),
        }
        sink.finish()
    }

    fn collect_text(&self, id: NodeId, sink: &mut TextSink) {
        for &child in self.children(id) {
            match self.data(child) {
                NodeData::Text(t) => sink.push_text(t, self.preserves_whitespace(child)),
                NodeData::Element(el) => {
                    if self.hides_subtree(child) || NON_RENDERED_TAGS.contains(&el.tag()) {
                        continue;
                    }
                    if el.tag() == "br" {
                        sink.hard_break();
                        continue;
                    }
                    let breaks = block_breaks(el.tag());
                    sink.request_breaks(breaks);
                    self.collect_text(child, sink);
                    sink.request_breaks(breaks);
                }
                NodeData::Document => {}
            }
        }
    }

    fn preserves_whitespace(&self, text: NodeId) -> bool {
        if self.is_content_editable(text) {
            return true;
        }
        let mut current = self.parent(text);
        while let Some(node) = current {
            if self.tag(node) == Some("pre") {
                return true;
            }
            current = self.parent(node);
        }
        false
    }
}

fn block_breaks(tag: &str) -> usize {
    match tag {
        "p" => 2,
        t if BLOCK_TAGS.contains(&t) => 1,
        _ => 0,
    }
}

fn style_hides(style: &str) -> bool {
    style.split(';').any(|decl| {
        let Some((prop, value)) = decl.split_once(':') else {
            return false;
        };
        let prop = prop.trim().to_ascii_lowercase();
        let value = value.trim().trim_end_matches("!important").trim().to_ascii_lowercase();
        (prop == "display" && value == "none") || (prop == "visibility" && value == "hidden")
    })
}

/// Accumulates rendered text, merging adjacent line-break requests.
#[derive(Default)]
struct TextSink {
    out: String,
    pending_breaks: usize,
    pending_space: bool,
}

impl TextSink {
    fn push_text(&mut self, text: &str, preserve: bool) {
        if preserve {
            if text.is_empty() {
                return;
            }
            self.flush_breaks();
            if self.pending_space {
                self.out.push(' ');
                self.pending_space = false;
            }
            self.out.push_str(text);
            return;
        }
        for ch in text.chars() {
            if ch.is_whitespace() {
                self.pending_space = true;
                continue;
            }
            self.flush_breaks();
            if self.pending_space && !self.out.is_empty() && !self.out.ends_with('\n') {
                self.out.push(' ');
            }
            self.pending_space = false;
            self.out.push(ch);
        }
    }

    fn hard_break(&mut self) {
        self.flush_breaks();
        self.pending_space = false;
        self.out.push('\n');
    }

    fn request_breaks(&mut self, count: usize) {
        self.pending_breaks = self.pending_breaks.max(count);
    }

    fn flush_breaks(&mut self) {
        if self.pending_breaks == 0 {
            return;
        }
        if !self.out.is_empty() {
            let trailing = self.out.chars().rev().take_while(|&c| c == '\n').count();
            for _ in trailing..self.pending_breaks {
                self.out.push('\n');
            }
        }
        self.pending_breaks = 0;
        self.pending_space = false;
    }

    fn finish(self) -> String {
        self.out
    }
}
