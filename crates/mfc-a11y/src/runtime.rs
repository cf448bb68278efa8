//! Accessibility Runtime
//!
//! The service object the app constructs once at start-up. It owns the
//! document and host handles and routes keyboard, focus, announcement and
//! language operations to the component that implements them.

use mfc_dom::{Document, KeyboardEvent, NodeId};

use crate::announcer::Announcer;
use crate::aria::Politeness;
use crate::capabilities::AssistiveCapabilities;
use crate::config::RuntimeConfig;
use crate::focus::{focusable_elements, FocusHistory, FocusTrapStack};
use crate::host::{HostEnvironment, Utterance, Voice};
use crate::landmarks;
use crate::language::{CulturalFormat, Language, LanguageState};
use crate::localization::TextRegistry;
use crate::shortcuts::{DispatchOutcome, ShortcutBinding, ShortcutRegistry, ShortcutSignature, UniversalNav};
use crate::AnnouncementId;

/// Clinic accessibility runtime
#[derive(Debug)]
pub struct AccessibilityRuntime {
    document: Document,
    host: HostEnvironment,
    config: RuntimeConfig,
    capabilities: AssistiveCapabilities,
    shortcuts: ShortcutRegistry,
    traps: FocusTrapStack,
    history: FocusHistory,
    announcer: Announcer,
    language: LanguageState,
    texts: TextRegistry,
}

impl AccessibilityRuntime {
    /// Detect assistive capabilities, prepare the page and restore the
    /// stored language preference.
    pub fn new(document: Document, host: HostEnvironment, config: RuntimeConfig) -> Self {
        let capabilities = AssistiveCapabilities::detect(&host);
        let mut announcer = Announcer::new(config.timing());
        announcer.set_profile(capabilities.screen_reader.profile());

        let mut runtime = Self {
            document,
            host,
            language: LanguageState::new(config.default_language),
            config,
            capabilities,
            shortcuts: ShortcutRegistry::new(),
            traps: FocusTrapStack::new(),
            history: FocusHistory::new(),
            announcer,
            texts: TextRegistry::with_defaults(),
        };
        runtime.prepare_page();
        runtime
    }

    fn prepare_page(&mut self) {
        self.switch_language(self.config.default_language);

        if self.config.augment_landmarks {
            let profile = self.capabilities.screen_reader.profile();
            if let Err(err) = landmarks::augment(&mut self.document, profile) {
                tracing::warn!(%err, "landmark augmentation failed");
            }
        }
        if self.config.skip_links {
            let label = self.get_localized_text("skip_to_main", None);
            match landmarks::insert_skip_link(&mut self.document, &label) {
                Ok(Some(link)) => tracing::debug!(node = %link, "skip link inserted"),
                Ok(None) => {}
                Err(err) => tracing::warn!(%err, "skip link insertion failed"),
            }
        }

        self.restore_language();
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn host(&self) -> &HostEnvironment {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut HostEnvironment {
        &mut self.host
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &AssistiveCapabilities {
        &self.capabilities
    }

    pub fn announcer(&self) -> &Announcer {
        &self.announcer
    }

    pub fn texts_mut(&mut self) -> &mut TextRegistry {
        &mut self.texts
    }

    // Shortcuts

    pub fn register_shortcut(&mut self, binding: ShortcutBinding) -> ShortcutSignature {
        self.shortcuts.register(binding)
    }

    pub fn unregister_shortcut(&mut self, signature: &ShortcutSignature) -> bool {
        self.shortcuts.unregister(signature)
    }

    pub fn shortcuts(&self) -> &ShortcutRegistry {
        &self.shortcuts
    }

    /// Global keydown handler.
    ///
    /// The active focus trap sees the event first, then the shortcut
    /// registry. Universal navigation keys are carried out here.
    pub fn handle_keydown(&mut self, event: &mut KeyboardEvent) -> DispatchOutcome {
        if let Some(target) = self.traps.handle_tab(&mut self.document, event) {
            return DispatchOutcome::FocusWrapped(target);
        }

        let outcome = self.shortcuts.dispatch(&mut self.document, event);
        match &outcome {
            DispatchOutcome::Universal(nav) => self.run_universal(*nav, event),
            DispatchOutcome::Fired { description, announce: true, .. } if self.config.announce_shortcuts => {
                self.announce(description, "shortcut", Politeness::Polite);
            }
            _ => {}
        }
        outcome
    }

    fn run_universal(&mut self, nav: UniversalNav, event: &mut KeyboardEvent) {
        match nav {
            UniversalNav::Escape => {
                if self.release_focus().is_some() {
                    event.prevent_default();
                    let message = self.get_localized_text("dialog_closed", None);
                    self.announce(&message, "focus", Politeness::Polite);
                }
            }
            UniversalNav::NextLandmark | UniversalNav::PrevLandmark => {
                let candidates = landmarks::landmarks(&self.document);
                let backwards = nav == UniversalNav::PrevLandmark;
                match self.cycle_focus(&candidates, backwards) {
                    Some(target) => {
                        event.prevent_default();
                        let name = landmarks::role_of(&self.document.tree, target)
                            .map_or_else(|| "landmark".to_string(), |role| role.to_string());
                        let message = self.get_localized_text("landmark_focused", None).replace("{name}", &name);
                        self.announce(&message, "navigation", Politeness::Polite);
                    }
                    None => {
                        let message = self.get_localized_text("no_landmarks", None);
                        self.announce(&message, "navigation", Politeness::Polite);
                    }
                }
            }
            UniversalNav::NextHeading | UniversalNav::PrevHeading => {
                let candidates = landmarks::headings(&self.document);
                let backwards = nav == UniversalNav::PrevHeading;
                if self.cycle_focus(&candidates, backwards).is_some() {
                    event.prevent_default();
                } else {
                    let message = self.get_localized_text("no_headings", None);
                    self.announce(&message, "navigation", Politeness::Polite);
                }
            }
            UniversalNav::FirstFocusable | UniversalNav::LastFocusable => {
                let container = self.traps.top().map_or(self.document.tree.root(), |trap| trap.container);
                let focusables = focusable_elements(&self.document.tree, container);
                let target = if nav == UniversalNav::FirstFocusable {
                    focusables.first()
                } else {
                    focusables.last()
                };
                if let Some(&target) = target {
                    if self.document.focus(target) {
                        event.prevent_default();
                    }
                }
            }
        }
    }

    /// Move focus to the next/previous candidate, giving it a
    /// programmatic focus target when it has none.
    fn cycle_focus(&mut self, candidates: &[NodeId], backwards: bool) -> Option<NodeId> {
        let current = self.document.active_element();
        let target = landmarks::cycle(&self.document, candidates, current, backwards)?;
        if !self.document.tree.has_attribute(target, "tabindex") {
            if let Err(err) = self.document.tree.set_attribute(target, "tabindex", "-1") {
                tracing::debug!(%err, "could not make navigation target focusable");
            }
        }
        self.document.focus(target).then_some(target)
    }

    // Focus

    pub fn trap_focus(&mut self, container: NodeId) -> bool {
        self.traps.trap(&mut self.document, container)
    }

    pub fn release_focus(&mut self) -> Option<NodeId> {
        self.traps.release()
    }

    pub fn focus_trap_depth(&self) -> usize {
        self.traps.depth()
    }

    pub fn save_focus(&mut self, key: &str) -> bool {
        self.history.save(&self.document, key)
    }

    pub fn restore_focus(&mut self, key: &str) -> bool {
        self.history.restore(&mut self.document, key)
    }

    // Announcements

    pub fn announce(&mut self, message: &str, category: &str, priority: Politeness) -> AnnouncementId {
        let id = self.announcer.announce(&mut self.document, message, category, priority, None);
        self.speak_emitted();
        id
    }

    /// Announce, dropping the message if it is still queued after `ttl_ms`
    pub fn announce_with_ttl(
        &mut self,
        message: &str,
        category: &str,
        priority: Politeness,
        ttl_ms: u64,
    ) -> AnnouncementId {
        let id = self.announcer.announce(&mut self.document, message, category, priority, Some(ttl_ms));
        self.speak_emitted();
        id
    }

    /// Drive the announcement timers forward
    pub fn advance_time(&mut self, elapsed_ms: u64) {
        self.announcer.advance(&mut self.document, elapsed_ms);
        self.speak_emitted();
    }

    pub fn now_ms(&self) -> u64 {
        self.announcer.now()
    }

    fn speak_emitted(&mut self) {
        let emitted = self.announcer.take_emitted();
        if emitted.is_empty() || !self.config.speak_announcements {
            return;
        }
        let lang = self.language.current().locale_tag();
        let voice = self.language.voice().map(|v| v.name.clone());
        let Some(speech) = self.host.speech_mut() else {
            return;
        };
        for item in emitted {
            if item.priority == Politeness::Assertive {
                speech.cancel();
            }
            speech.speak(Utterance {
                text: item.text,
                lang: lang.clone(),
                voice: voice.clone(),
                rate: 1.0,
            });
        }
    }

    // Language

    /// Switch the interface language. Unsupported codes are rejected with
    /// a warning and change nothing.
    pub fn set_language(&mut self, code: &str) -> bool {
        let language = match Language::parse(code) {
            Ok(language) => language,
            Err(err) => {
                tracing::warn!(%err, "language change rejected");
                return false;
            }
        };

        self.switch_language(language);

        let key = self.config.language_storage_key.clone();
        match self.host.storage_mut() {
            Some(store) => {
                if let Err(err) = store.set(&key, language.code()) {
                    tracing::warn!(%err, "language preference not saved");
                }
            }
            None => tracing::debug!("no preference storage, language not persisted"),
        }

        tracing::info!(language = %language, "language changed");
        let message = self
            .get_localized_text("language_changed", None)
            .replace("{language}", language.native_name());
        self.announce(&message, "language", Politeness::Assertive);
        true
    }

    /// Apply the persisted language preference, if valid. Does not
    /// announce.
    pub fn restore_language(&mut self) -> bool {
        let key = &self.config.language_storage_key;
        let Some(stored) = self.host.storage().and_then(|store| store.get(key)) else {
            return false;
        };
        match Language::parse(&stored) {
            Ok(language) => {
                self.switch_language(language);
                tracing::debug!(language = %language, "language preference restored");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "ignoring stored language preference");
                false
            }
        }
    }

    fn switch_language(&mut self, language: Language) {
        let voices = self.host.voices();
        match self.language.apply(&mut self.document, language, &voices) {
            Ok(formatted) => tracing::debug!(language = %language, formatted, "language applied"),
            Err(err) => tracing::warn!(%err, language = %language, "language only partly applied"),
        }

        if let Some(link) = landmarks::existing_skip_link(&self.document) {
            let label = self.get_localized_text("skip_to_main", None);
            if let Err(err) = self.document.tree.set_text_content(link, &label) {
                tracing::debug!(%err, "skip link label not updated");
            }
        }
    }

    pub fn current_language(&self) -> Language {
        self.language.current()
    }

    /// Localized text for `key`: current language, then English, then
    /// `fallback`, then the key itself.
    pub fn get_localized_text(&self, key: &str, fallback: Option<&str>) -> String {
        self.texts.lookup(key, self.language.current(), fallback)
    }

    pub fn preferred_voice(&self) -> Option<&Voice> {
        self.language.voice()
    }

    pub fn cultural_format(&self) -> CulturalFormat {
        self.language.current().cultural_format()
    }
}
