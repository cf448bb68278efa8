//! Document - High-level document API

use url::Url;

use crate::{DomTree, NodeId};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    active_element: Option<NodeId>,
}

impl Document {
    /// Create a document with `html`, `head` and `body`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes under a fresh root cannot violate hierarchy rules.
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            active_element: None,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            active_element: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    /// Path component of the document URL
    pub fn path(&self) -> String {
        match Url::parse(&self.url) {
            Ok(url) => url.path().to_string(),
            Err(_) => self.url.split(['?', '#']).next().unwrap_or_default().to_string(),
        }
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.attribute(node, "id") == Some(id))
    }

    /// Connected elements with the given tag, in document order
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .filter(|&node| self.tree.tag_name(node).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
            .collect()
    }

    /// Focused element, if it is still attached
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element.filter(|&id| self.tree.is_connected(id))
    }

    /// Move focus to an attached element
    pub fn focus(&mut self, id: NodeId) -> bool {
        if self.tree.element(id).is_none() || !self.tree.is_connected(id) {
            tracing::debug!(node = %id, "focus target not attached");
            return false;
        }
        self.active_element = Some(id);
        tracing::trace!(node = %id, "focus moved");
        true
    }

    pub fn blur(&mut self) {
        self.active_element = None;
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path() {
        let doc = Document::new("https://clinic.example/doctors/42?tab=reviews");
        assert_eq!(doc.path(), "/doctors/42");

        let relative = Document::new("/dashboard#today");
        assert_eq!(relative.path(), "/dashboard");
    }

    #[test]
    fn test_focus_requires_attachment() {
        let mut doc = Document::default();
        let button = doc.tree.create_element("button");
        assert!(!doc.focus(button));

        doc.tree.append_child(doc.body(), button).unwrap();
        assert!(doc.focus(button));
        assert_eq!(doc.active_element(), Some(button));

        doc.tree.detach(button);
        assert_eq!(doc.active_element(), None);
    }
}
