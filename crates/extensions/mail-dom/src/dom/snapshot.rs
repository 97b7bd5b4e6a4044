//! Import of a DevTools `DOM.getDocument` (pierce mode) snapshot.
//!
//! Iframes that carry a `contentDocument` become same-origin frames; iframes
//! without one were not scriptable from the page and become cross-origin.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use super::document::Document;
use super::frame::FrameContent;
use super::node::NodeId;

const ELEMENT_NODE: i64 = 1;
const TEXT_NODE: i64 = 3;
const CDATA_SECTION_NODE: i64 = 4;
const DOCUMENT_NODE: i64 = 9;
const DOCUMENT_FRAGMENT_NODE: i64 = 11;

/// DOM node as reported by the DevTools protocol.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomNode {
    #[serde(default)]
    pub node_id: i64,
    #[serde(default)]
    pub backend_node_id: i64,
    pub node_type: i64,
    pub node_name: String,
    pub local_name: Option<String>,
    pub node_value: Option<String>,
    pub children: Option<Vec<DomNode>>,
    /// Flattened `[name, value, name, value, ...]`.
    pub attributes: Option<Vec<String>>,
    pub frame_id: Option<String>,
    #[serde(rename = "documentURL")]
    pub document_url: Option<String>,
    pub content_document: Option<Box<DomNode>>,
    pub shadow_roots: Option<Vec<DomNode>>,
}

/// A captured page: its URL plus the document tree.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub root: DomNode,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot root must be a document node, got node type {0}")]
    NotADocument(i64),

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PageSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Document {
    /// Build a document from a snapshot root (`nodeType` 9).
    pub fn from_snapshot(root: &DomNode) -> Result<Document, SnapshotError> {
        if root.node_type != DOCUMENT_NODE {
            return Err(SnapshotError::NotADocument(root.node_type));
        }
        let mut doc = Document::empty();
        let parent = doc.root();
        for child in root.children.iter().flatten() {
            import_node(&mut doc, parent, child)?;
        }
        Ok(doc)
    }
}

fn import_node(doc: &mut Document, parent: NodeId, node: &DomNode) -> Result<(), SnapshotError> {
    match node.node_type {
        ELEMENT_NODE => {
            let tag = node.local_name.as_deref().unwrap_or(&node.node_name);
            let id = doc.create_element(tag);
            let attributes = node.attributes.as_deref().unwrap_or(&[]);
            for pair in attributes.chunks(2) {
                if let [name, value] = pair {
                    doc.set_attr(id, name, value.as_str());
                }
            }
            doc.append_child(parent, id);

            // Shadow content renders in place of light children.
            for shadow in node.shadow_roots.iter().flatten() {
                import_node(doc, id, shadow)?;
            }
            for child in node.children.iter().flatten() {
                import_node(doc, id, child)?;
            }

            if doc.tag(id) == Some("textarea") {
                let value = doc.text_content(id);
                if let Some(field) = doc.field_mut(id) {
                    field.value = value;
                }
            }
            if doc.tag(id) == Some("iframe") {
                let content = match &node.content_document {
                    Some(inner) => FrameContent::same_origin(Document::from_snapshot(inner)?),
                    None => FrameContent::cross_origin(frame_origin(doc.attr(id, "src"))),
                };
                doc.attach_frame(id, content);
            }
        }
        TEXT_NODE | CDATA_SECTION_NODE => {
            let id = doc.create_text(node.node_value.clone().unwrap_or_default());
            doc.append_child(parent, id);
        }
        DOCUMENT_FRAGMENT_NODE => {
            for child in node.children.iter().flatten() {
                import_node(doc, parent, child)?;
            }
        }
        // Comments, doctypes and processing instructions carry no content.
        _ => {}
    }
    Ok(())
}

fn frame_origin(src: Option<&str>) -> String {
    src.and_then(|s| Url::parse(s).ok())
        .map(|u| u.origin().ascii_serialization())
        .unwrap_or_else(|| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::FrameAccess;
    use serde_json::json;

    fn snapshot() -> DomNode {
        serde_json::from_value(json!({
            "nodeId": 1,
            "nodeType": 9,
            "nodeName": "#document",
            "children": [
                { "nodeType": 10, "nodeName": "html" },
                {
                    "nodeType": 1, "nodeName": "HTML", "localName": "html",
                    "children": [{
                        "nodeType": 1, "nodeName": "BODY", "localName": "body",
                        "children": [
                            {
                                "nodeType": 1, "nodeName": "DIV", "localName": "div",
                                "attributes": ["contenteditable", "true", "aria-label", "Message Body"],
                                "children": [{ "nodeType": 3, "nodeName": "#text", "nodeValue": "Hi" }]
                            },
                            {
                                "nodeType": 1, "nodeName": "TEXTAREA", "localName": "textarea",
                                "children": [{ "nodeType": 3, "nodeName": "#text", "nodeValue": "draft" }]
                            },
                            {
                                "nodeType": 1, "nodeName": "IFRAME", "localName": "iframe",
                                "attributes": ["src", "https://ads.example.net/frame?x=1"]
                            },
                            {
                                "nodeType": 1, "nodeName": "IFRAME", "localName": "iframe",
                                "contentDocument": {
                                    "nodeType": 9, "nodeName": "#document",
                                    "children": [{
                                        "nodeType": 1, "nodeName": "HTML", "localName": "html",
                                        "children": [{
                                            "nodeType": 1, "nodeName": "BODY", "localName": "body",
                                            "attributes": ["contenteditable", ""]
                                        }]
                                    }]
                                }
                            }
                        ]
                    }]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_import_elements_and_text() {
        let doc = Document::from_snapshot(&snapshot()).unwrap();
        let body = doc.body().unwrap();
        let editor = doc.children(body)[0];
        assert_eq!(doc.tag(editor), Some("div"));
        assert_eq!(doc.attr(editor, "aria-label"), Some("Message Body"));
        assert_eq!(doc.text_content(editor), "Hi");
    }

    #[test]
    fn test_textarea_value_seeded_from_children() {
        let doc = Document::from_snapshot(&snapshot()).unwrap();
        let textarea = doc.children(doc.body().unwrap())[1];
        assert_eq!(doc.field(textarea).unwrap().value, "draft");
    }

    #[test]
    fn test_frames_classified_by_content_document() {
        let doc = Document::from_snapshot(&snapshot()).unwrap();
        let frames = doc.iframes();
        assert_eq!(frames.len(), 2);
        match doc.frame(frames[0]) {
            FrameAccess::NotAccessible { origin } => assert_eq!(origin, "https://ads.example.net"),
            other => panic!("expected cross-origin frame, got {other:?}"),
        }
        match doc.frame(frames[1]) {
            FrameAccess::Accessible(inner) => {
                let body = inner.body().unwrap();
                assert!(inner.is_editing_host(body));
            }
            other => panic!("expected same-origin frame, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_document_root() {
        let node: DomNode = serde_json::from_value(json!({
            "nodeType": 1, "nodeName": "DIV"
        }))
        .unwrap();
        assert!(matches!(
            Document::from_snapshot(&node),
            Err(SnapshotError::NotADocument(1))
        ));
    }

    #[test]
    fn test_page_snapshot_from_json() {
        let json = r##"{"url":"https://mail.google.com/mail/u/0/","root":{"nodeType":9,"nodeName":"#document"}}"##;
        let snap = PageSnapshot::from_json(json).unwrap();
        assert_eq!(snap.url, "https://mail.google.com/mail/u/0/");
        assert!(PageSnapshot::from_json("{").is_err());
    }
}
