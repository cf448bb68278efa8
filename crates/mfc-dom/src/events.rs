//! Keyboard events
//!
//! Keydown events delivered to the accessibility runtime.

use std::fmt;

use crate::NodeId;

/// Modifier key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { ctrl: false, alt: false, shift: false, meta: false };
    pub const CTRL: Modifiers = Modifiers { ctrl: true, ..Self::NONE };
    pub const ALT: Modifiers = Modifiers { alt: true, ..Self::NONE };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ..Self::NONE };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl fmt::Display for Modifiers {
    /// Renders as `Ctrl+Alt+Shift+Meta+` prefix (empty when no modifier is held)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl { f.write_str("Ctrl+")?; }
        if self.alt { f.write_str("Alt+")?; }
        if self.shift { f.write_str("Shift+")?; }
        if self.meta { f.write_str("Meta+")?; }
        Ok(())
    }
}

/// Keydown event
#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    /// `KeyboardEvent.key` value, e.g. `"d"`, `"Tab"`, `"ArrowDown"`
    pub key: String,
    pub modifiers: Modifiers,
    /// Element the event was dispatched to
    pub target: NodeId,
    pub cancelable: bool,
    default_prevented: bool,
}

impl KeyboardEvent {
    pub fn new(key: &str, target: NodeId) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
            target,
            cancelable: true,
            default_prevented: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn ctrl(mut self) -> Self { self.modifiers.ctrl = true; self }
    pub fn alt(mut self) -> Self { self.modifiers.alt = true; self }
    pub fn shift(mut self) -> Self { self.modifiers.shift = true; self }
    pub fn meta(mut self) -> Self { self.modifiers.meta = true; self }

    /// Case-insensitive comparison of the `key` value
    pub fn key_is(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
