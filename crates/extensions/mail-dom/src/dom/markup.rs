//! HTML parsing through kuchikiki and serialization of the arena.

use html_escape::{encode_double_quoted_attribute, encode_text};
use kuchikiki::traits::*;
use kuchikiki::NodeRef;

use super::document::Document;
use super::node::{NodeData, NodeId};

/// Elements whose content never reaches the arena.
const DROPPED_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

impl Document {
    /// Parse a full page or a bare fragment. The HTML parser synthesizes a
    /// missing `<html>`/`<body>`, so [`Document::body`] always resolves.
    pub fn parse_html(html: &str) -> Document {
        let parsed = kuchikiki::parse_html().one(html);
        let mut doc = Document::empty();
        let root = doc.root();
        for child in parsed.children() {
            doc.import_parsed(root, &child);
        }
        doc
    }

    /// Parse `markup` as body content and append the resulting nodes to
    /// `parent`. Returns the top-level nodes created.
    pub fn append_markup(&mut self, parent: NodeId, markup: &str) -> Vec<NodeId> {
        let parsed = kuchikiki::parse_html().one(format!("<body>{markup}").as_str());
        let Ok(body) = parsed.select_first("body") else {
            return Vec::new();
        };
        body.as_node()
            .children()
            .filter_map(|child| self.import_parsed(parent, &child))
            .collect()
    }

    /// Copy `node` and its subtree under `parent`. Comments, doctypes and
    /// processing instructions are skipped.
    fn import_parsed(&mut self, parent: NodeId, node: &NodeRef) -> Option<NodeId> {
        if let Some(text) = node.as_text() {
            let id = self.create_text(text.borrow().clone());
            self.append_child(parent, id);
            return Some(id);
        }

        let element = node.as_element()?;
        let tag = element.name.local.to_string();
        let id = self.create_element(&tag);
        for (name, attr) in element.attributes.borrow().map.iter() {
            self.set_attr(id, &name.local, attr.value.as_str());
        }
        self.append_child(parent, id);

        if !DROPPED_CONTENT_TAGS.contains(&tag.as_str()) {
            for child in node.children() {
                self.import_parsed(id, &child);
            }
        }
        if tag == "textarea" {
            let value = self.text_content(id);
            if let Some(field) = self.field_mut(id) {
                field.value = value;
            }
        }
        Some(id)
    }

    /// Serialized children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.serialize(child, &mut out);
        }
        out
    }

    /// Serialized `id` including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize(id, &mut out);
        out
    }

    fn serialize(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            NodeData::Text(t) => out.push_str(&encode_text(t)),
            NodeData::Document => {
                for &child in self.children(id) {
                    self.serialize(child, out);
                }
            }
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(el.tag());
                for (name, value) in el.attributes() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&encode_double_quoted_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if el.is_void() {
                    return;
                }
                match el.field() {
                    Some(field) if el.tag() == "textarea" => out.push_str(&encode_text(&field.value)),
                    _ => {
                        for &child in self.children(id) {
                            self.serialize(child, out);
                        }
                    }
                }
                out.push_str("</");
                out.push_str(el.tag());
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
#[path = "markup_tests.rs"]
mod tests;
