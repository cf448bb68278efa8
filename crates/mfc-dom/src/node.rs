//! DOM Node
//!
//! Nodes link to parent and siblings by `NodeId` rather than pointers,
//! so the whole tree lives in one `Vec`.

use crate::{NodeId, Rect};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::with_data(NodeData::Text(content.to_string()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
}

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    attrs: Vec<Attribute>,
    /// `None` models `display: none` (no layout box)
    render_box: Option<Rect>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            render_box: Some(Rect::default()),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Set an attribute, returning the previous value
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            return Some(std::mem::replace(&mut attr.value, value.to_string()));
        }
        self.attrs.push(Attribute {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        });
        None
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(pos).value)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attrs
    }

    /// Whitespace-separated entries of the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attribute("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attribute("class", &joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let remaining: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let joined = remaining.join(" ");
        self.set_attribute("class", &joined);
    }

    pub fn render_box(&self) -> Option<Rect> {
        self.render_box
    }

    pub fn set_render_box(&mut self, render_box: Option<Rect>) {
        self.render_box = render_box;
    }

    /// Element produces a layout box (not `display: none` and not `hidden`)
    pub fn is_rendered(&self) -> bool {
        self.render_box.is_some() && !self.has_attribute("hidden")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_overwrite() {
        let mut elem = ElementData::new("BUTTON");
        assert_eq!(elem.tag, "button");
        assert_eq!(elem.set_attribute("Type", "submit"), None);
        assert_eq!(elem.set_attribute("type", "reset"), Some("submit".to_string()));
        assert_eq!(elem.attribute("TYPE"), Some("reset"));
        assert_eq!(elem.attributes().len(), 1);
    }

    #[test]
    fn test_class_list() {
        let mut elem = ElementData::new("body");
        elem.add_class("dashboard");
        elem.add_class("high-contrast");
        elem.add_class("dashboard");
        assert_eq!(elem.attribute("class"), Some("dashboard high-contrast"));

        elem.remove_class("dashboard");
        assert!(!elem.has_class("dashboard"));
        assert!(elem.has_class("high-contrast"));
    }

    #[test]
    fn test_rendered() {
        let mut elem = ElementData::new("div");
        assert!(elem.is_rendered());
        elem.set_attribute("hidden", "");
        assert!(!elem.is_rendered());
        elem.remove_attribute("hidden");
        elem.set_render_box(None);
        assert!(!elem.is_rendered());
        elem.set_render_box(Some(Rect::new(0.0, 40.0, 320.0, 24.0)));
        assert!(elem.is_rendered());
        assert_eq!(elem.render_box().map(|r| r.width), Some(320.0));
    }
}
