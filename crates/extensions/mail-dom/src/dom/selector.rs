//! CSS selectors, compiled and matched by kuchikiki.
//!
//! The arena is copied into a kuchikiki tree for each query; every copied
//! element remembers the arena node it stands for, so matches map back to
//! [`NodeId`]s in document order.

use std::fmt;

use kuchikiki::traits::*;
use kuchikiki::{Attribute, ExpandedName, NodeDataRef, NodeRef, Selectors};
use thiserror::Error;

use super::document::Document;
use super::node::{NodeData, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("invalid selector: {0}")]
    Invalid(String),
}

/// A selector list that is known to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }
        Selectors::compile(source).map_err(|_| SelectorError::Invalid(source.to_string()))?;
        Ok(Self {
            source: source.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn compile(&self) -> Option<Selectors> {
        Selectors::compile(&self.source).ok()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

type MirroredElement = (NodeDataRef<kuchikiki::ElementData>, NodeId);

impl Document {
    /// First connected element matching `selector`, in document order.
    pub fn query_selector(&self, selector: &Selector) -> Option<NodeId> {
        self.query_selector_all(selector).into_iter().next()
    }

    /// Every connected element matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        let Some(compiled) = selector.compile() else {
            return Vec::new();
        };
        self.mirror()
            .into_iter()
            .filter(|(element, _)| compiled.matches(element))
            .map(|(_, id)| id)
            .collect()
    }

    /// Copy the connected tree into kuchikiki, returning the copied elements
    /// in document order.
    fn mirror(&self) -> Vec<MirroredElement> {
        let mut elements = Vec::new();
        // Element names are cloned from a parsed element so they carry the
        // HTML namespace the matcher expects.
        let Ok(template) = kuchikiki::parse_html().one("<div></div>").select_first("div") else {
            return elements;
        };
        let root = NodeRef::new_document();
        self.mirror_children(self.root(), &root, &template, &mut elements);
        elements
    }

    fn mirror_children(
        &self,
        from: NodeId,
        into: &NodeRef,
        template: &NodeDataRef<kuchikiki::ElementData>,
        elements: &mut Vec<MirroredElement>,
    ) {
        for &child in self.children(from) {
            match self.data(child) {
                NodeData::Element(el) => {
                    let mut name = template.name.clone();
                    name.local = el.tag().into();
                    let attributes = el.attributes().iter().map(|(attr, value)| {
                        (
                            ExpandedName::new("", attr.as_str()),
                            Attribute {
                                prefix: None,
                                value: value.clone(),
                            },
                        )
                    });
                    let node = NodeRef::new_element(name, attributes);
                    into.append(node.clone());
                    if let Some(element) = node.clone().into_element_ref() {
                        elements.push((element, child));
                    }
                    self.mirror_children(child, &node, template, elements);
                }
                NodeData::Text(text) => into.append(NodeRef::new_text(text.clone())),
                NodeData::Document => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
