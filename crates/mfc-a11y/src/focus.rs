//! Focus Management
//!
//! Focus traps for modal containers and named focus save/restore slots.

use std::collections::HashMap;

use mfc_dom::{Document, DomTree, KeyboardEvent, NodeId};

/// Slot used when callers do not name one
pub const DEFAULT_FOCUS_KEY: &str = "default";

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    NotFocusable,       // tabindex="-1" or unparsable
    Sequential(i32),    // tabindex="0" or positive
}

impl TabIndex {
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(n) if n >= 0 => Self::Sequential(n),
            _ => Self::NotFocusable,
        }
    }

    pub fn is_focusable(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }
}

/// Keyboard-focusable by the trap rules: `a[href]`, enabled form
/// controls, non-negative `tabindex`, `contenteditable`.
pub fn is_focusable(tree: &DomTree, id: NodeId) -> bool {
    let Some(elem) = tree.element(id) else {
        return false;
    };
    let by_tag = match elem.tag.as_str() {
        "a" => elem.has_attribute("href"),
        "button" | "input" | "select" | "textarea" => !elem.has_attribute("disabled"),
        _ => false,
    };
    let by_tabindex = elem.attribute("tabindex").is_some_and(|v| TabIndex::parse(v).is_focusable());
    let editable = elem
        .attribute("contenteditable")
        .is_some_and(|v| !v.eq_ignore_ascii_case("false"));
    by_tag || by_tabindex || editable
}

/// Visible focusable descendants of `container`, in document order
pub fn focusable_elements(tree: &DomTree, container: NodeId) -> Vec<NodeId> {
    tree.descendants(container)
        .filter(|&id| is_focusable(tree, id))
        .filter(|&id| is_visible(tree, id))
        .collect()
}

/// An element is visible when it and every ancestor element render
fn is_visible(tree: &DomTree, id: NodeId) -> bool {
    std::iter::once(id)
        .chain(tree.ancestors(id))
        .all(|node| tree.element(node).is_none_or(|e| e.is_rendered()))
}

/// One trapped container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTrap {
    pub container: NodeId,
    /// Snapshot taken when the trap was entered
    pub focusables: Vec<NodeId>,
}

impl FocusTrap {
    pub fn first(&self) -> Option<NodeId> {
        self.focusables.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.focusables.last().copied()
    }

    /// Wrap target for Tab (`backwards == false`) or Shift+Tab. `None`
    /// when focus is not on the boundary element and the host should
    /// move focus normally.
    pub fn wrap_target(&self, current: Option<NodeId>, backwards: bool) -> Option<NodeId> {
        let current = current?;
        if backwards && Some(current) == self.first() {
            self.last()
        } else if !backwards && Some(current) == self.last() {
            self.first()
        } else {
            None
        }
    }
}

/// Stack of focus traps; only the top one intercepts Tab
#[derive(Debug, Default)]
pub struct FocusTrapStack {
    traps: Vec<FocusTrap>,
}

impl FocusTrapStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trap focus inside `container` and focus its first focusable
    /// element.
    ///
    /// A container without focusable descendants is left alone: nothing
    /// is pushed and `false` is returned.
    pub fn trap(&mut self, doc: &mut Document, container: NodeId) -> bool {
        if doc.tree.element(container).is_none() {
            tracing::debug!(node = %container, "focus trap target is not an element");
            return false;
        }
        let focusables = focusable_elements(&doc.tree, container);
        let Some(&first) = focusables.first() else {
            tracing::warn!(node = %container, "focus trap has no focusable elements, ignoring");
            return false;
        };

        doc.focus(first);
        tracing::debug!(node = %container, count = focusables.len(), depth = self.traps.len() + 1, "focus trapped");
        self.traps.push(FocusTrap { container, focusables });
        true
    }

    /// Pop the most recent trap. Focus is not restored.
    pub fn release(&mut self) -> Option<NodeId> {
        let trap = self.traps.pop()?;
        tracing::debug!(node = %trap.container, depth = self.traps.len(), "focus trap released");
        Some(trap.container)
    }

    pub fn top(&self) -> Option<&FocusTrap> {
        self.traps.last()
    }

    pub fn depth(&self) -> usize {
        self.traps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traps.is_empty()
    }

    /// Keydown listener of the top trap. Returns the newly focused
    /// element when Tab wrapped.
    pub fn handle_tab(&self, doc: &mut Document, event: &mut KeyboardEvent) -> Option<NodeId> {
        let mods = event.modifiers;
        if !event.key_is("Tab") || mods.ctrl || mods.alt || mods.meta {
            return None;
        }
        let target = self.top()?.wrap_target(doc.active_element(), mods.shift)?;
        if !doc.focus(target) {
            return None;
        }
        event.prevent_default();
        Some(target)
    }
}

/// Named focus slots
#[derive(Debug, Default)]
pub struct FocusHistory {
    slots: HashMap<String, NodeId>,
}

impl FocusHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the focused element under `key`. Returns false when
    /// nothing is focused; the slot is cleared.
    pub fn save(&mut self, doc: &Document, key: &str) -> bool {
        let Some(active) = doc.active_element() else {
            self.slots.remove(key);
            return false;
        };
        self.slots.insert(key.to_string(), active);
        true
    }

    /// Refocus the element saved under `key`; a detached element is a
    /// silent no-op.
    pub fn restore(&self, doc: &mut Document, key: &str) -> bool {
        match self.slots.get(key) {
            Some(&id) if doc.tree.is_connected(id) => doc.focus(id),
            _ => false,
        }
    }

    pub fn saved(&self, key: &str) -> Option<NodeId> {
        self.slots.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog() -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::default();
        let dialog = doc.tree.create_element("div");
        doc.tree.append_child(doc.body(), dialog).unwrap();

        let mut controls = Vec::new();
        for tag in ["input", "select", "button"] {
            let id = doc.tree.create_element(tag);
            doc.tree.append_child(dialog, id).unwrap();
            controls.push(id);
        }
        (doc, dialog, controls)
    }

    #[test]
    fn test_tab_index() {
        assert!(!TabIndex::parse("-1").is_focusable());
        assert!(TabIndex::parse("0").is_focusable());
        assert!(TabIndex::parse(" 5 ").is_focusable());
        assert!(!TabIndex::parse("auto").is_focusable());
    }

    #[test]
    fn test_focusable_rules() {
        let mut doc = Document::default();
        let body = doc.body();
        let link = doc.tree.create_element("a");
        let anchor = doc.tree.create_element("a");
        let disabled = doc.tree.create_element("button");
        let span = doc.tree.create_element("span");
        let hidden = doc.tree.create_element("input");
        let editable = doc.tree.create_element("div");
        for id in [link, anchor, disabled, span, hidden, editable] {
            doc.tree.append_child(body, id).unwrap();
        }
        doc.tree.set_attribute(link, "href", "/doctors").unwrap();
        doc.tree.set_attribute(disabled, "disabled", "").unwrap();
        doc.tree.set_attribute(span, "tabindex", "0").unwrap();
        doc.tree.set_attribute(hidden, "hidden", "").unwrap();
        doc.tree.set_attribute(editable, "contenteditable", "").unwrap();

        assert_eq!(focusable_elements(&doc.tree, body), vec![link, span, editable]);
    }

    #[test]
    fn test_hidden_ancestor_hides_controls() {
        let (mut doc, dialog, controls) = dialog();
        let section = doc.tree.create_element("div");
        let details = doc.tree.create_element("button");
        doc.tree.append_child(dialog, section).unwrap();
        doc.tree.append_child(section, details).unwrap();
        assert_eq!(focusable_elements(&doc.tree, dialog).len(), 4);

        doc.tree.set_attribute(section, "hidden", "").unwrap();
        assert_eq!(focusable_elements(&doc.tree, dialog), controls);

        // A collapsed container without a render box hides its subtree too
        assert!(doc.tree.remove_attribute(section, "hidden").is_some());
        doc.tree.element_mut(dialog).unwrap().set_render_box(None);
        assert!(focusable_elements(&doc.tree, dialog).is_empty());

        let mut stack = FocusTrapStack::new();
        assert!(!stack.trap(&mut doc, dialog));
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn test_wrap_target() {
        let trap = FocusTrap { container: NodeId::ROOT, focusables: vec![] };
        assert_eq!(trap.wrap_target(None, false), None);

        let (_, dialog, c) = dialog();
        let trap = FocusTrap { container: dialog, focusables: c.clone() };
        assert_eq!(trap.wrap_target(Some(c[2]), false), Some(c[0]));
        assert_eq!(trap.wrap_target(Some(c[0]), true), Some(c[2]));
        assert_eq!(trap.wrap_target(Some(c[1]), false), None);
    }

    #[test]
    fn test_nested_traps() {
        let (mut doc, outer, outer_controls) = dialog();
        let inner = doc.tree.create_element("div");
        let ok = doc.tree.create_element("button");
        doc.tree.append_child(doc.body(), inner).unwrap();
        doc.tree.append_child(inner, ok).unwrap();

        let mut stack = FocusTrapStack::new();
        assert!(stack.trap(&mut doc, outer));
        assert!(stack.trap(&mut doc, inner));
        assert_eq!(doc.active_element(), Some(ok));

        // Single element wraps onto itself
        let mut tab = KeyboardEvent::new("Tab", ok);
        assert_eq!(stack.handle_tab(&mut doc, &mut tab), Some(ok));

        assert_eq!(stack.release(), Some(inner));
        assert_eq!(stack.top().map(|t| t.container), Some(outer));

        doc.focus(outer_controls[2]);
        let mut tab = KeyboardEvent::new("Tab", outer_controls[2]);
        assert_eq!(stack.handle_tab(&mut doc, &mut tab), Some(outer_controls[0]));
        assert!(tab.is_default_prevented());
    }

    #[test]
    fn test_save_without_focus() {
        let (mut doc, _, controls) = dialog();
        let mut history = FocusHistory::new();
        assert!(!history.save(&doc, DEFAULT_FOCUS_KEY));

        doc.focus(controls[1]);
        assert!(history.save(&doc, DEFAULT_FOCUS_KEY));
        doc.blur();
        assert!(!history.save(&doc, DEFAULT_FOCUS_KEY));
        assert_eq!(history.saved(DEFAULT_FOCUS_KEY), None);

        // Restoring does not jump back to the older element
        doc.focus(controls[2]);
        assert!(!history.restore(&mut doc, DEFAULT_FOCUS_KEY));
        assert_eq!(doc.active_element(), Some(controls[2]));
    }
}
