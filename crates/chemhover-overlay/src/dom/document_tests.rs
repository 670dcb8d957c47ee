use super::*;
use crate::dom::event::Selection;

fn paragraph(doc: &mut Document, text: &str) -> (NodeId, NodeId) {
    let p = doc.create_element("P");
    let t = doc.create_text(text);
    doc.append_child(p, t).unwrap();
    doc.append_child(doc.body(), p).unwrap();
    (p, t)
}

#[test]
fn test_new_document_has_connected_body() {
    let doc = Document::new();
    assert_eq!(doc.tag_name(doc.body()), Some("body"));
    assert!(doc.is_connected(doc.body()));
    assert_eq!(doc.outer_html(doc.body()), "<body></body>");
}

#[test]
fn test_tag_names_are_lowercase() {
    let mut doc = Document::new();
    let (p, t) = paragraph(&mut doc, "hello");
    assert_eq!(doc.tag_name(p), Some("p"));
    assert_eq!(doc.tag_name(t), None);
    assert_eq!(doc.text(t), Some("hello"));
    assert_eq!(doc.parent(t), Some(p));
}

#[test]
fn test_detached_nodes_are_not_connected() {
    let mut doc = Document::new();
    let span = doc.create_element("span");
    let text = doc.create_text("x");
    doc.append_child(span, text).unwrap();
    assert!(!doc.is_connected(text));

    doc.append_child(doc.body(), span).unwrap();
    assert!(doc.is_connected(text));

    doc.remove(span).unwrap();
    assert!(!doc.is_connected(text));
    assert_eq!(doc.parent(span), None);
    assert_eq!(doc.parent(text), Some(span));
}

#[test]
fn test_append_moves_node() {
    let mut doc = Document::new();
    let (a, t) = paragraph(&mut doc, "moving");
    let (b, _) = paragraph(&mut doc, "target");
    doc.append_child(b, t).unwrap();
    assert!(doc.children(a).is_empty());
    assert_eq!(doc.children(b).len(), 2);
    assert_eq!(doc.parent(t), Some(b));
}

#[test]
fn test_invalid_hierarchy() {
    let mut doc = Document::new();
    let (p, t) = paragraph(&mut doc, "text");
    let other = doc.create_text("child");

    assert!(matches!(
        doc.append_child(t, other),
        Err(DomError::InvalidHierarchy { .. })
    ));
    assert!(matches!(
        doc.append_child(t, p),
        Err(DomError::InvalidHierarchy { .. })
    ));
    assert!(matches!(
        doc.append_child(p, doc.body()),
        Err(DomError::InvalidHierarchy { .. })
    ));
}

#[test]
fn test_replace_child_keeps_position() {
    let mut doc = Document::new();
    let p = doc.create_element("p");
    let a = doc.create_text("a");
    let b = doc.create_text("b");
    let c = doc.create_text("c");
    for n in [a, b, c] {
        doc.append_child(p, n).unwrap();
    }
    let span = doc.create_element("span");
    doc.replace_child(b, span).unwrap();

    assert_eq!(doc.children(p), &[a, span, c]);
    assert_eq!(doc.parent(b), None);
    assert_eq!(doc.parent(span), Some(p));
}

#[test]
fn test_replace_detached_node_fails() {
    let mut doc = Document::new();
    let orphan = doc.create_text("orphan");
    let span = doc.create_element("span");
    assert_eq!(
        doc.replace_child(orphan, span),
        Err(DomError::Detached(orphan.index()))
    );
}

#[test]
fn test_unknown_node() {
    let mut doc = Document::new();
    let ghost = NodeId(99);
    assert!(!doc.contains(ghost));
    assert_eq!(doc.remove(ghost), Err(DomError::NodeNotFound(99)));
    assert_eq!(doc.set_text(ghost, "x"), Err(DomError::NodeNotFound(99)));
    assert!(doc.children(ghost).is_empty());
}

#[test]
fn test_set_text_requires_text_node() {
    let mut doc = Document::new();
    let (p, t) = paragraph(&mut doc, "before");
    doc.set_text(t, "after").unwrap();
    assert_eq!(doc.text(t), Some("after"));
    assert_eq!(doc.set_text(p, "x"), Err(DomError::NotText(p.index())));
}

#[test]
fn test_get_element_by_id_only_finds_connected() {
    let mut doc = Document::new();
    let (p, _) = paragraph(&mut doc, "x");
    doc.set_attribute(p, "id", "para").unwrap();
    assert_eq!(doc.get_element_by_id("para"), Some(p));

    let loose = doc.create_element("div");
    doc.set_attribute(loose, "id", "loose").unwrap();
    assert_eq!(doc.get_element_by_id("loose"), None);

    doc.remove(p).unwrap();
    assert_eq!(doc.get_element_by_id("para"), None);
}

#[test]
fn test_outer_html_serialization() {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    doc.set_attribute(div, "id", "d\"1").unwrap();
    doc.set_style(div, "position", "absolute").unwrap();
    doc.set_style(div, "z-index", "100").unwrap();
    let text = doc.create_text("a < b");
    let br = doc.create_element("br");
    let comment = doc.create_comment(" note ");
    for n in [text, br, comment] {
        doc.append_child(div, n).unwrap();
    }

    assert_eq!(
        doc.outer_html(div),
        "<div id=\"d&quot;1\" style=\"position: absolute; z-index: 100;\">a &lt; b<br><!-- note --></div>"
    );
    assert_eq!(doc.inner_html(div), "a &lt; b<br><!-- note -->");
}

#[test]
fn test_style_overwrites_in_place() {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    doc.set_style(div, "display", "block").unwrap();
    doc.set_style(div, "left", "1px").unwrap();
    doc.set_style(div, "display", "none").unwrap();
    assert_eq!(doc.style(div, "display"), Some("none"));
    assert_eq!(doc.outer_html(div), "<div style=\"display: none; left: 1px;\"></div>");
}

#[test]
fn test_text_content_skips_comments() {
    let mut doc = Document::new();
    let (p, _) = paragraph(&mut doc, "water ");
    let comment = doc.create_comment("hidden");
    let b = doc.create_element("b");
    let t = doc.create_text("H2O");
    doc.append_child(p, comment).unwrap();
    doc.append_child(b, t).unwrap();
    doc.append_child(p, b).unwrap();
    assert_eq!(doc.text_content(p), "water H2O");
}

#[test]
fn test_is_editable() {
    let mut doc = Document::new();
    let area = doc.create_element("textarea");
    let inside = doc.create_text("H2O");
    doc.append_child(area, inside).unwrap();

    let editor = doc.create_element("div");
    doc.set_attribute(editor, "contenteditable", "true").unwrap();
    let nested = doc.create_element("p");
    let deep = doc.create_text("CO2");
    doc.append_child(nested, deep).unwrap();
    doc.append_child(editor, nested).unwrap();

    let off = doc.create_element("div");
    doc.set_attribute(off, "contenteditable", "false").unwrap();
    let plain = doc.create_text("NaCl");
    doc.append_child(off, plain).unwrap();

    assert!(doc.is_editable(inside));
    assert!(doc.is_editable(deep));
    assert!(!doc.is_editable(plain));
}

#[test]
fn test_descendants_in_tree_order() {
    let mut doc = Document::new();
    let (p1, t1) = paragraph(&mut doc, "one");
    let (p2, t2) = paragraph(&mut doc, "two");
    assert_eq!(doc.descendants(doc.body()), vec![doc.body(), p1, t1, p2, t2]);
}

#[tokio::test]
async fn test_observer_sees_connected_changes_only() {
    let mut doc = Document::new();
    let mut observer = doc.observe();

    let p = doc.create_element("p");
    let t = doc.create_text("detached build");
    doc.append_child(p, t).unwrap();
    assert!(observer.try_batch().is_none());

    doc.append_child(doc.body(), p).unwrap();
    let batch = observer.next_batch().await.unwrap();
    assert_eq!(
        batch,
        vec![MutationRecord {
            target: doc.body(),
            added: vec![p],
            removed: vec![],
        }]
    );

    let span = doc.create_element("span");
    doc.replace_child(t, span).unwrap();
    let batch = observer.try_batch().unwrap();
    assert_eq!(batch[0].added, vec![span]);
    assert_eq!(batch[0].removed, vec![t]);

    doc.set_text(t, "character data is not observed").unwrap();
    assert!(observer.try_batch().is_none());
}

#[test]
fn test_dropped_observer_is_forgotten() {
    let mut doc = Document::new();
    let observer = doc.observe();
    drop(observer);
    let p = doc.create_element("p");
    doc.append_child(doc.body(), p).unwrap();
    assert!(doc.observers.is_empty());
}

#[test]
fn test_pointer_events_bubble() {
    let mut doc = Document::new();
    let label = doc.create_element("span");
    let text = doc.create_text("H2O");
    let modal = doc.create_element("div");
    doc.append_child(label, text).unwrap();
    doc.append_child(label, modal).unwrap();
    doc.append_child(doc.body(), label).unwrap();

    doc.set_pointer_binding(
        label,
        PointerBinding {
            over: Some(PointerAction::ShowAt(modal)),
            out: Some(PointerAction::Hide(modal)),
        },
    )
    .unwrap();

    assert_eq!(doc.dispatch_pointer(text, PointerEvent::Over { x: 12, y: 30 }), 1);
    assert_eq!(doc.style(modal, "display"), Some("block"));
    assert_eq!(doc.style(modal, "left"), Some("12px"));
    assert_eq!(doc.style(modal, "top"), Some("30px"));

    assert_eq!(doc.dispatch_pointer(label, PointerEvent::Out), 1);
    assert_eq!(doc.style(modal, "display"), Some("none"));

    assert_eq!(doc.dispatch_pointer(doc.body(), PointerEvent::Out), 0);
}

#[test]
fn test_selection_constructors() {
    let a = NodeId(1);
    let b = NodeId(2);
    assert_eq!(Selection::collapsed(a), Selection::new(a, a));
    assert_ne!(Selection::new(a, b).start, Selection::new(a, b).end);
}
