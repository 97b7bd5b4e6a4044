use html_escape::encode_safe;

use super::*;

#[test]
fn test_escaped_text_parses_back_verbatim() {
    let text = r#"<script>alert("x")</script> & 'quoted' <b>"#;
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let nodes = doc.append_markup(body, &format!("<div>{}</div>", encode_safe(text)));
    assert_eq!(nodes.len(), 1);
    assert_eq!(doc.children(nodes[0]).len(), 1);
    assert_eq!(doc.text_content(nodes[0]), text);
}

#[test]
fn test_fragment_gets_html_and_body() {
    let doc = Document::parse_html("<p>Hello &amp; <b>world</b></p>");
    let body = doc.body().unwrap();
    assert_eq!(doc.tag(doc.parent(body).unwrap()), Some("html"));
    assert_eq!(doc.inner_html(body), "<p>Hello &amp; <b>world</b></p>");
}

#[test]
fn test_full_page_keeps_structure() {
    let doc = Document::parse_html(
        "<!DOCTYPE html><html><head><title>Inbox</title></head><body><p>x</p></body></html>",
    );
    let body = doc.body().unwrap();
    assert_eq!(doc.inner_html(body), "<p>x</p>");
    let html = doc.children(doc.root())[0];
    let head = doc.children(html)[0];
    assert_eq!(doc.text_content(head), "Inbox");
}

#[test]
fn test_comments_and_scripts_dropped() {
    let doc = Document::parse_html(r#"<div id="d"><!-- note --><script>var a = "<b>";</script>Hi</div>"#);
    let div = doc.elements().into_iter().find(|&id| doc.tag(id) == Some("div")).unwrap();
    assert_eq!(doc.text_content(div), "Hi");
    assert_eq!(doc.inner_html(div), "<script></script>Hi");
}

#[test]
fn test_textarea_content_becomes_value() {
    let doc = Document::parse_html("<textarea>a &lt; <b>b</b></textarea>");
    let textarea = doc.elements().into_iter().find(|&id| doc.tag(id) == Some("textarea")).unwrap();
    assert_eq!(doc.field(textarea).unwrap().value, "a < <b>b</b>");
    assert_eq!(doc.outer_html(textarea), "<textarea>a &lt; &lt;b&gt;b&lt;/b&gt;</textarea>");
}

#[test]
fn test_void_elements_and_self_closing_syntax() {
    let doc = Document::parse_html(r#"<div>a<br>b<img src="x"/>c<span/>d</div>"#);
    let div = doc.children(doc.body().unwrap())[0];
    let tags: Vec<_> = doc
        .children(div)
        .iter()
        .map(|&id| doc.tag(id).unwrap_or("#text"))
        .collect();
    // `/>` only closes void elements; the span stays open around "d".
    assert_eq!(tags, ["#text", "br", "#text", "img", "#text", "span"]);
    assert_eq!(doc.text_content(doc.children(div)[5]), "d");
}

#[test]
fn test_attribute_forms() {
    let doc = Document::parse_html(r#"<DIV Data-X='1' hidden class=Am title="a &amp; b"></DIV>"#);
    let div = doc.children(doc.body().unwrap())[0];
    assert_eq!(doc.tag(div), Some("div"));
    assert_eq!(doc.attr(div, "data-x"), Some("1"));
    assert_eq!(doc.attr(div, "hidden"), Some(""));
    assert_eq!(doc.attr(div, "class"), Some("Am"));
    assert_eq!(doc.attr(div, "title"), Some("a & b"));
}

#[test]
fn test_unbalanced_end_tags() {
    let doc = Document::parse_html("</p><div><span>a</div>b");
    let body = doc.body().unwrap();
    let children = doc.children(body);
    assert_eq!(children.len(), 2);
    assert_eq!(doc.tag(children[0]), Some("div"));
    assert_eq!(doc.text(children[1]), Some("b"));
}

#[test]
fn test_append_markup_returns_top_level_nodes() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let nodes = doc.append_markup(body, "<p>a</p>text<br>");
    assert_eq!(nodes.len(), 3);
    assert!(nodes.iter().all(|&n| doc.parent(n) == Some(body)));
}

#[test]
fn test_append_markup_into_nested_parent() {
    let mut doc = Document::parse_html(r#"<div id="editor"><p>Hi,</p></div>"#);
    let editor = doc.children(doc.body().unwrap())[0];
    let nodes = doc.append_markup(editor, "<div>line<br>next</div>");
    assert_eq!(nodes.len(), 1);
    assert_eq!(doc.parent(nodes[0]), Some(editor));
    assert_eq!(doc.inner_html(editor), "<p>Hi,</p><div>line<br>next</div>");
}

#[test]
fn test_outer_html_escapes_attributes() {
    let doc = Document::parse_html(r#"<input value="a&quot;b">"#);
    let input = doc.children(doc.body().unwrap())[0];
    assert_eq!(doc.field(input).unwrap().value, "a\"b");
    assert_eq!(doc.outer_html(input), r#"<input value="a&quot;b">"#);
}

#[test]
fn test_text_escapes_only_markup_characters() {
    let doc = Document::parse_html("<p>1 < 2 &amp; \"it's\" > 0</p>");
    let p = doc.children(doc.body().unwrap())[0];
    assert_eq!(doc.text_content(p), "1 < 2 & \"it's\" > 0");
    assert_eq!(doc.inner_html(p), "1 &lt; 2 &amp; \"it's\" &gt; 0");
}
