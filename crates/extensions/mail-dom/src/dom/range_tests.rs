use super::*;
use crate::dom::Selector;

fn q(doc: &Document, selector: &str) -> NodeId {
    doc.query_selector(&Selector::parse(selector).unwrap()).unwrap()
}

fn editor_doc() -> (Document, NodeId, NodeId) {
    let doc = Document::parse_html(r#"<div id="e" contenteditable="true">Hello world</div>"#);
    let editor = q(&doc, "#e");
    let text = doc.children(editor)[0];
    (doc, editor, text)
}

#[test]
fn test_selection_collapsed() {
    let (_, editor, _) = editor_doc();
    let caret = Selection::collapsed(BoundaryPoint::new(editor, 0));
    assert!(caret.is_collapsed());
    let span = Selection::new(BoundaryPoint::new(editor, 0), BoundaryPoint::new(editor, 1));
    assert!(!span.is_collapsed());
}

#[test]
fn test_compare_points_element_and_text() {
    let (doc, editor, text) = editor_doc();
    let before_text = BoundaryPoint::new(editor, 0);
    let text_start = BoundaryPoint::new(text, 0);
    let text_end = BoundaryPoint::new(text, 11);
    let after_text = BoundaryPoint::new(editor, 1);

    assert_eq!(doc.compare_points(before_text, text_start).unwrap(), Ordering::Less);
    assert_eq!(doc.compare_points(text_start, text_end).unwrap(), Ordering::Less);
    assert_eq!(doc.compare_points(text_end, after_text).unwrap(), Ordering::Less);
    assert_eq!(doc.compare_points(after_text, after_text).unwrap(), Ordering::Equal);
}

#[test]
fn test_range_from_backward_selection() {
    let (doc, _, text) = editor_doc();
    let selection = Selection::new(BoundaryPoint::new(text, 5), BoundaryPoint::new(text, 1));
    let range = doc.range_from_selection(&selection).unwrap();
    assert_eq!(range.start, BoundaryPoint::new(text, 1));
    assert_eq!(range.end, BoundaryPoint::new(text, 5));
}

#[test]
fn test_validation_errors() {
    let (mut doc, _, text) = editor_doc();
    let detached = doc.create_text("loose");
    let br = doc.create_element("br");
    let body = doc.body().unwrap();
    doc.append_child(body, br);

    let err = doc
        .compare_points(BoundaryPoint::new(text, 50), BoundaryPoint::new(text, 0))
        .unwrap_err();
    assert_eq!(
        err,
        RangeError::OffsetOutOfBounds {
            node: text,
            offset: 50,
            length: 11
        }
    );
    assert_eq!(
        doc.compare_points(BoundaryPoint::new(detached, 0), BoundaryPoint::new(text, 0)),
        Err(RangeError::DetachedBoundary(detached))
    );
    assert_eq!(
        doc.compare_points(BoundaryPoint::new(br, 0), BoundaryPoint::new(text, 0)),
        Err(RangeError::NotAContainer(br))
    );
}

#[test]
fn test_split_text() {
    let (mut doc, editor, text) = editor_doc();
    let tail = doc.split_text(text, 5).unwrap();
    assert_eq!(doc.text(text), Some("Hello"));
    assert_eq!(doc.text(tail), Some(" world"));
    assert_eq!(doc.children(editor), &[text, tail]);
}

#[test]
fn test_split_text_multibyte() {
    let mut doc = Document::parse_html("<p>héllo</p>");
    let p = q(&doc, "p");
    let text = doc.children(p)[0];
    let tail = doc.split_text(text, 2).unwrap();
    assert_eq!(doc.text(text), Some("hé"));
    assert_eq!(doc.text(tail), Some("llo"));
}

#[test]
fn test_delete_contents_inside_text() {
    let (mut doc, editor, text) = editor_doc();
    let range = Range {
        start: BoundaryPoint::new(text, 6),
        end: BoundaryPoint::new(text, 11),
    };
    let point = doc.delete_contents(&range).unwrap();
    assert_eq!(point, BoundaryPoint::new(editor, 1));
    assert_eq!(doc.text_content(editor), "Hello ");

    let there = doc.create_text("there");
    let after = doc.insert_nodes(point, &[there]).unwrap();
    assert_eq!(after, BoundaryPoint::new(editor, 2));
    assert_eq!(doc.text_content(editor), "Hello there");
}

#[test]
fn test_delete_collapsed_range_splits_only() {
    let (mut doc, editor, text) = editor_doc();
    let caret = BoundaryPoint::new(text, 5);
    let point = doc.delete_contents(&Range { start: caret, end: caret }).unwrap();
    assert_eq!(point, BoundaryPoint::new(editor, 1));

    let comma = doc.create_text(",");
    doc.insert_nodes(point, &[comma]).unwrap();
    assert_eq!(doc.text_content(editor), "Hello, world");
}

#[test]
fn test_delete_contents_across_elements() {
    let mut doc = Document::parse_html(r#"<div id="e"><p>one</p><p>two</p><p>three</p></div>"#);
    let editor = q(&doc, "#e");
    let paragraphs = doc.children(editor).to_vec();
    let first = doc.children(paragraphs[0])[0];
    let last = doc.children(paragraphs[2])[0];

    let range = Range {
        start: BoundaryPoint::new(first, 1),
        end: BoundaryPoint::new(last, 2),
    };
    let point = doc.delete_contents(&range).unwrap();

    assert_eq!(doc.text_content(editor), "oree");
    assert_eq!(doc.children(editor), &[paragraphs[0], paragraphs[2]]);
    assert_eq!(point, BoundaryPoint::new(paragraphs[0], 1));
}

#[test]
fn test_delete_contents_whole_element_children() {
    let mut doc = Document::parse_html(r#"<div id="e"><b>bold</b> and <i>italic</i></div>"#);
    let editor = q(&doc, "#e");
    let range = Range {
        start: BoundaryPoint::new(editor, 0),
        end: BoundaryPoint::new(editor, 3),
    };
    let point = doc.delete_contents(&range).unwrap();
    assert!(doc.children(editor).is_empty());
    assert_eq!(point, BoundaryPoint::new(editor, 0));
}

#[test]
fn test_failed_delete_leaves_document_unchanged() {
    let (mut doc, editor, text) = editor_doc();
    let range = Range {
        start: BoundaryPoint::new(text, 2),
        end: BoundaryPoint::new(text, 40),
    };
    assert!(doc.delete_contents(&range).is_err());
    assert_eq!(doc.children(editor), &[text]);
    assert_eq!(doc.text(text), Some("Hello world"));
}

#[test]
fn test_insert_nodes_rejects_text_container() {
    let (mut doc, _, text) = editor_doc();
    let node = doc.create_text("x");
    assert_eq!(
        doc.insert_nodes(BoundaryPoint::new(text, 0), &[node]),
        Err(RangeError::NotAContainer(text))
    );
}
