//! Tree tests for mfc-dom
//!
//! Structure, traversal order and text content.

use mfc_dom::{Document, DomTree, NodeId};

#[test]
fn test_dom_tree_creation() {
    let mut tree = DomTree::new();

    // div > span > text
    let div = tree.create_element("div");
    let span = tree.create_element("span");
    let text = tree.create_text("Hello, clinic!");

    tree.append_child(tree.root(), div).unwrap();
    tree.append_child(div, span).unwrap();
    tree.append_child(span, text).unwrap();

    assert_eq!(tree.len(), 4);

    let div_node = tree.get(div).unwrap();
    assert_eq!(div_node.parent, tree.root());
    assert_eq!(div_node.first_child, span);
    assert_eq!(tree.get(span).unwrap().first_child, text);
}

#[test]
fn test_dom_tree_siblings() {
    let mut tree = DomTree::new();

    let div = tree.create_element("div");
    let p1 = tree.create_element("p");
    let p2 = tree.create_element("p");
    let p3 = tree.create_element("p");

    tree.append_child(tree.root(), div).unwrap();
    tree.append_child(div, p1).unwrap();
    tree.append_child(div, p2).unwrap();
    tree.append_child(div, p3).unwrap();

    let node1 = tree.get(p1).unwrap();
    assert_eq!(node1.next_sibling, p2);
    assert!(!node1.prev_sibling.is_valid());

    tree.detach(p2);
    assert_eq!(tree.get(p1).unwrap().next_sibling, p3);
    assert_eq!(tree.get(p3).unwrap().prev_sibling, p1);
}

#[test]
fn test_descendants_preorder() {
    let mut tree = DomTree::new();
    let main = tree.create_element("main");
    let section = tree.create_element("section");
    let h1 = tree.create_element("h1");
    let p = tree.create_element("p");
    let aside = tree.create_element("aside");

    tree.append_child(tree.root(), main).unwrap();
    tree.append_child(main, section).unwrap();
    tree.append_child(section, h1).unwrap();
    tree.append_child(section, p).unwrap();
    tree.append_child(main, aside).unwrap();

    let order: Vec<NodeId> = tree.descendants(main).collect();
    assert_eq!(order, vec![section, h1, p, aside]);

    // A subtree walk never escapes its root
    let inner: Vec<NodeId> = tree.descendants(section).collect();
    assert_eq!(inner, vec![h1, p]);
}

#[test]
fn test_text_content_roundtrip() {
    let mut doc = Document::default();
    let status = doc.tree.create_element("div");
    doc.tree.append_child(doc.body(), status).unwrap();

    doc.tree.set_text_content(status, "Appointment confirmed").unwrap();
    assert_eq!(doc.tree.text_content(status), "Appointment confirmed");

    doc.tree.set_text_content(status, "").unwrap();
    assert_eq!(doc.tree.text_content(status), "");
    assert_eq!(doc.tree.children(status).count(), 0);
}

#[test]
fn test_get_element_by_id() {
    let mut doc = Document::new("https://clinic.example/");
    let main = doc.tree.create_element("main");
    doc.tree.set_attribute(main, "id", "main-content").unwrap();
    doc.tree.append_child(doc.body(), main).unwrap();

    assert_eq!(doc.get_element_by_id("main-content"), Some(main));
    assert_eq!(doc.get_element_by_id("missing"), None);
    assert_eq!(doc.elements_by_tag("MAIN"), vec![main]);
}

#[test]
fn test_set_attribute_on_text_fails() {
    let mut tree = DomTree::new();
    let text = tree.create_text("plain");
    assert!(tree.set_attribute(text, "role", "status").is_err());
}
