//! Keyboard Shortcuts
//!
//! Registry of application shortcuts and the keydown dispatcher.
//!
//! Dispatch order for one keydown:
//! 1. a bare Escape is reported to the caller, whatever the target;
//! 2. other events targeting text-entry elements are ignored;
//! 3. universal navigation chords (Alt+Arrow, Ctrl+Home/End) are
//!    reported to the caller and never reach the table;
//! 4. the first binding, in registration order, whose key and modifiers
//!    match exactly is selected;
//! 5. a scoped binding only fires when the document path contains its
//!    scope or the body carries a class equal to it.

use std::fmt;

use mfc_dom::{Document, KeyboardEvent, Modifiers, NodeId};

/// Callback bound to a shortcut
pub type ShortcutAction = Box<dyn FnMut(&mut Document, &KeyboardEvent)>;

/// Uniqueness key of a binding: modifiers + key + category
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortcutSignature {
    key: String,
    modifiers: Modifiers,
    category: String,
}

impl ShortcutSignature {
    pub fn new(key: &str, modifiers: Modifiers, category: &str) -> Self {
        Self {
            key: normalize_key(key),
            modifiers,
            category: category.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Human-readable chord, e.g. `Ctrl+Shift+D`
    pub fn chord(&self) -> String {
        let key = if self.key.chars().count() == 1 {
            self.key.to_uppercase()
        } else {
            self.key.clone()
        };
        format!("{}{}", self.modifiers, key)
    }

    /// Exact key and modifier match
    pub fn matches(&self, event: &KeyboardEvent) -> bool {
        event.modifiers == self.modifiers && normalize_key(&event.key) == self.key
    }
}

impl fmt::Display for ShortcutSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.chord(), self.category)
    }
}

/// Single-character keys compare case-insensitively; named keys
/// (`ArrowDown`, `Escape`) keep their spelling.
fn normalize_key(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Registered shortcut
pub struct ShortcutBinding {
    pub key: String,
    pub modifiers: Modifiers,
    pub category: String,
    pub description: String,
    /// Restricts the binding to a path fragment or body class
    pub scope: Option<String>,
    /// Announce the description when the shortcut fires
    pub announce: bool,
    action: ShortcutAction,
}

impl ShortcutBinding {
    pub fn new(
        key: &str,
        description: &str,
        action: impl FnMut(&mut Document, &KeyboardEvent) + 'static,
    ) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
            category: "general".to_string(),
            description: description.to_string(),
            scope: None,
            announce: true,
            action: Box::new(action),
        }
    }

    pub fn ctrl(mut self) -> Self { self.modifiers.ctrl = true; self }
    pub fn alt(mut self) -> Self { self.modifiers.alt = true; self }
    pub fn shift(mut self) -> Self { self.modifiers.shift = true; self }
    pub fn meta(mut self) -> Self { self.modifiers.meta = true; self }

    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_string());
        self
    }

    /// Do not announce when fired
    pub fn silent(mut self) -> Self {
        self.announce = false;
        self
    }

    pub fn signature(&self) -> ShortcutSignature {
        ShortcutSignature::new(&self.key, self.modifiers, &self.category)
    }

    fn in_scope(&self, doc: &Document) -> bool {
        let Some(scope) = self.scope.as_deref() else {
            return true;
        };
        doc.path().contains(scope) || doc.tree.has_class(doc.body(), scope)
    }
}

impl fmt::Debug for ShortcutBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortcutBinding")
            .field("signature", &self.signature())
            .field("description", &self.description)
            .field("scope", &self.scope)
            .field("announce", &self.announce)
            .finish_non_exhaustive()
    }
}

/// Built-in navigation chords handled outside the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniversalNav {
    Escape,
    NextLandmark,
    PrevLandmark,
    NextHeading,
    PrevHeading,
    FirstFocusable,
    LastFocusable,
}

impl UniversalNav {
    /// Match only the exact chord; `ArrowDown` without Alt is not universal.
    pub fn from_event(event: &KeyboardEvent) -> Option<Self> {
        let mods = event.modifiers;
        Some(match event.key.as_str() {
            "Escape" | "Esc" if mods.is_empty() => Self::Escape,
            "ArrowDown" if mods == Modifiers::ALT => Self::NextLandmark,
            "ArrowUp" if mods == Modifiers::ALT => Self::PrevLandmark,
            "ArrowRight" if mods == Modifiers::ALT => Self::NextHeading,
            "ArrowLeft" if mods == Modifiers::ALT => Self::PrevHeading,
            "Home" if mods == Modifiers::CTRL => Self::FirstFocusable,
            "End" if mods == Modifiers::CTRL => Self::LastFocusable,
            _ => return None,
        })
    }
}

/// What happened to a keydown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Target is a text-entry element
    IgnoredTextInput,
    /// Tab wrapped inside the active focus trap
    FocusWrapped(NodeId),
    /// Universal navigation chord; the runtime acts on it
    Universal(UniversalNav),
    /// A binding fired
    Fired {
        signature: ShortcutSignature,
        description: String,
        announce: bool,
    },
    /// First matching binding is scoped elsewhere
    OutOfScope(ShortcutSignature),
    Unmatched,
}

/// Shortcut registry
#[derive(Debug, Default)]
pub struct ShortcutRegistry {
    bindings: Vec<ShortcutBinding>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding. A binding with the same signature is replaced in
    /// place and keeps its original registration position.
    pub fn register(&mut self, binding: ShortcutBinding) -> ShortcutSignature {
        let signature = binding.signature();
        match self.bindings.iter().position(|b| b.signature() == signature) {
            Some(pos) => {
                tracing::debug!(shortcut = %signature, "replacing shortcut");
                self.bindings[pos] = binding;
            }
            None => {
                tracing::debug!(shortcut = %signature, "registered shortcut");
                self.bindings.push(binding);
            }
        }
        signature
    }

    pub fn unregister(&mut self, signature: &ShortcutSignature) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| &b.signature() != signature);
        let removed = self.bindings.len() != before;
        if removed {
            tracing::debug!(shortcut = %signature, "unregistered shortcut");
        }
        removed
    }

    pub fn get(&self, signature: &ShortcutSignature) -> Option<&ShortcutBinding> {
        self.bindings.iter().find(|b| &b.signature() == signature)
    }

    /// Bindings in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ShortcutBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Dispatch one keydown
    pub fn dispatch(&mut self, doc: &mut Document, event: &mut KeyboardEvent) -> DispatchOutcome {
        // Escape must release a trap even from inside a form field
        let universal = UniversalNav::from_event(event);
        if universal == Some(UniversalNav::Escape) {
            return DispatchOutcome::Universal(UniversalNav::Escape);
        }

        if is_text_entry(doc, event.target) {
            return DispatchOutcome::IgnoredTextInput;
        }

        if let Some(nav) = universal {
            return DispatchOutcome::Universal(nav);
        }

        let Some(binding) = self.bindings.iter_mut().find(|b| b.signature().matches(event)) else {
            return DispatchOutcome::Unmatched;
        };

        let signature = binding.signature();
        if !binding.in_scope(doc) {
            tracing::debug!(shortcut = %signature, path = %doc.path(), "shortcut out of scope");
            return DispatchOutcome::OutOfScope(signature);
        }

        event.prevent_default();
        (binding.action)(doc, event);
        tracing::debug!(shortcut = %signature, "shortcut fired");

        DispatchOutcome::Fired {
            signature,
            description: binding.description.clone(),
            announce: binding.announce,
        }
    }
}

/// `input`, `textarea`, `select`, or inside an editable region
pub fn is_text_entry(doc: &Document, target: NodeId) -> bool {
    if matches!(doc.tree.tag_name(target), Some("input" | "textarea" | "select")) {
        return true;
    }
    std::iter::once(target)
        .chain(doc.tree.ancestors(target))
        .find_map(|node| doc.tree.attribute(node, "contenteditable"))
        .is_some_and(|value| !value.eq_ignore_ascii_case("false"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut(&mut Document, &KeyboardEvent) + 'static) {
        let hits = Rc::new(Cell::new(0));
        let handle = Rc::clone(&hits);
        (hits, move |_: &mut Document, _: &KeyboardEvent| handle.set(handle.get() + 1))
    }

    fn page() -> (Document, NodeId) {
        let mut doc = Document::new("https://clinic.example/dashboard");
        let button = doc.tree.create_element("button");
        doc.tree.append_child(doc.body(), button).unwrap();
        (doc, button)
    }

    #[test]
    fn test_signature_chord() {
        let sig = ShortcutSignature::new("d", Modifiers { ctrl: true, shift: true, ..Modifiers::NONE }, "nav");
        assert_eq!(sig.chord(), "Ctrl+Shift+D");
        assert_eq!(sig.to_string(), "Ctrl+Shift+D (nav)");
        assert_eq!(ShortcutSignature::new("D", Modifiers::NONE, "nav").key(), "d");
    }

    #[test]
    fn test_first_registered_wins() {
        let (doc_hits_a, action_a) = counter();
        let (doc_hits_b, action_b) = counter();
        let mut registry = ShortcutRegistry::new();
        registry.register(ShortcutBinding::new("k", "first", action_a).ctrl().category("a"));
        registry.register(ShortcutBinding::new("k", "second", action_b).ctrl().category("b"));

        let (mut doc, button) = page();
        let mut event = KeyboardEvent::new("k", button).ctrl();
        let outcome = registry.dispatch(&mut doc, &mut event);

        assert!(matches!(outcome, DispatchOutcome::Fired { ref description, .. } if description == "first"));
        assert_eq!(doc_hits_a.get(), 1);
        assert_eq!(doc_hits_b.get(), 0);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let (_, first) = counter();
        let (_, other) = counter();
        let (_, replacement) = counter();
        let mut registry = ShortcutRegistry::new();
        registry.register(ShortcutBinding::new("a", "old", first));
        registry.register(ShortcutBinding::new("b", "other", other));
        registry.register(ShortcutBinding::new("A", "new", replacement));

        let descriptions: Vec<&str> = registry.iter().map(|b| b.description.as_str()).collect();
        assert_eq!(descriptions, vec!["new", "other"]);
    }

    #[test]
    fn test_text_input_ignored() {
        let (hits, action) = counter();
        let mut registry = ShortcutRegistry::new();
        registry.register(ShortcutBinding::new("d", "dashboard", action).ctrl());

        let (mut doc, _) = page();
        let input = doc.tree.create_element("input");
        doc.tree.append_child(doc.body(), input).unwrap();

        let mut event = KeyboardEvent::new("d", input).ctrl();
        assert_eq!(registry.dispatch(&mut doc, &mut event), DispatchOutcome::IgnoredTextInput);
        assert!(!event.is_default_prevented());
        assert_eq!(hits.get(), 0);

        // Other universal chords stay with the field
        let mut arrow = KeyboardEvent::new("ArrowDown", input).alt();
        assert_eq!(registry.dispatch(&mut doc, &mut arrow), DispatchOutcome::IgnoredTextInput);
    }

    #[test]
    fn test_escape_from_text_input() {
        let mut registry = ShortcutRegistry::new();
        let (mut doc, _) = page();
        let field = doc.tree.create_element("textarea");
        doc.tree.append_child(doc.body(), field).unwrap();

        let mut escape = KeyboardEvent::new("Escape", field);
        assert_eq!(registry.dispatch(&mut doc, &mut escape), DispatchOutcome::Universal(UniversalNav::Escape));
    }

    #[test]
    fn test_contenteditable_inherited() {
        let (mut doc, _) = page();
        let editor = doc.tree.create_element("div");
        let para = doc.tree.create_element("p");
        doc.tree.set_attribute(editor, "contenteditable", "true").unwrap();
        doc.tree.append_child(doc.body(), editor).unwrap();
        doc.tree.append_child(editor, para).unwrap();
        assert!(is_text_entry(&doc, para));

        doc.tree.set_attribute(para, "contenteditable", "false").unwrap();
        assert!(!is_text_entry(&doc, para));
    }

    #[test]
    fn test_universal_not_overridable() {
        let (hits, action) = counter();
        let mut registry = ShortcutRegistry::new();
        registry.register(ShortcutBinding::new("Escape", "close", action));

        let (mut doc, button) = page();
        let mut escape = KeyboardEvent::new("Escape", button);
        assert_eq!(registry.dispatch(&mut doc, &mut escape), DispatchOutcome::Universal(UniversalNav::Escape));
        assert_eq!(hits.get(), 0);

        // Plain ArrowDown is not the Alt+ArrowDown chord
        let mut arrow = KeyboardEvent::new("ArrowDown", button);
        assert_eq!(UniversalNav::from_event(&arrow), None);
        assert_eq!(registry.dispatch(&mut doc, &mut arrow), DispatchOutcome::Unmatched);
    }

    #[test]
    fn test_scope() {
        let (hits, action) = counter();
        let mut registry = ShortcutRegistry::new();
        let sig = registry.register(ShortcutBinding::new("r", "refresh schedule", action).alt().scope("schedule"));

        let (mut doc, button) = page();
        let mut event = KeyboardEvent::new("r", button).alt();
        assert_eq!(registry.dispatch(&mut doc, &mut event), DispatchOutcome::OutOfScope(sig));
        assert_eq!(hits.get(), 0);

        let body = doc.body();
        doc.tree.add_class(body, "schedule").unwrap();
        let mut event = KeyboardEvent::new("r", button).alt();
        assert!(matches!(registry.dispatch(&mut doc, &mut event), DispatchOutcome::Fired { .. }));
        assert_eq!(hits.get(), 1);
    }
}
