//! Host Environment
//!
//! What the runtime reads from and writes to outside the UI tree:
//! navigator identity, speech synthesis and preference storage. Each
//! service is optional; a missing one is recorded as unsupported.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::A11yError;

/// Navigator identity strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    pub platform: String,
    pub user_agent: String,
}

impl Navigator {
    pub fn new(platform: &str, user_agent: &str) -> Self {
        Self {
            platform: platform.to_string(),
            user_agent: user_agent.to_string(),
        }
    }
}

/// Speech synthesis voice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 tag, e.g. `zh-SG`
    pub lang: String,
    pub default: bool,
}

impl Voice {
    pub fn new(name: &str, lang: &str) -> Self {
        Self {
            name: name.to_string(),
            lang: lang.to_string(),
            default: false,
        }
    }
}

/// Utterance handed to the speech engine
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub voice: Option<String>,
    pub rate: f32,
}

/// Speech synthesis engine
pub trait SpeechSynthesis {
    fn voices(&self) -> Vec<Voice>;
    fn speak(&mut self, utterance: Utterance);
    fn cancel(&mut self);
}

/// Key/value preference storage (`localStorage`)
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), A11yError>;
    fn remove(&mut self, key: &str);
}

/// In-memory preference store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), A11yError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Speech engine that records utterances instead of playing them
#[derive(Debug, Clone, Default)]
pub struct MemorySpeech {
    voices: Vec<Voice>,
    spoken: Rc<RefCell<Vec<Utterance>>>,
}

impl MemorySpeech {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            spoken: Rc::default(),
        }
    }

    /// Shared handle to the utterance log, usable after the engine is
    /// moved into a `HostEnvironment`
    pub fn log(&self) -> Rc<RefCell<Vec<Utterance>>> {
        Rc::clone(&self.spoken)
    }
}

impl SpeechSynthesis for MemorySpeech {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&mut self, utterance: Utterance) {
        self.spoken.borrow_mut().push(utterance);
    }

    fn cancel(&mut self) {
        self.spoken.borrow_mut().clear();
    }
}

/// Host services available to the runtime
#[derive(Default)]
pub struct HostEnvironment {
    pub navigator: Navigator,
    /// Names of host globals visible to detection (e.g. `nvda`)
    pub globals: HashSet<String>,
    speech: Option<Box<dyn SpeechSynthesis>>,
    storage: Option<Box<dyn PreferenceStore>>,
}

impl HostEnvironment {
    pub fn new(navigator: Navigator) -> Self {
        Self {
            navigator,
            ..Default::default()
        }
    }

    pub fn with_speech(mut self, speech: impl SpeechSynthesis + 'static) -> Self {
        self.speech = Some(Box::new(speech));
        self
    }

    pub fn with_storage(mut self, storage: impl PreferenceStore + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    pub fn with_global(mut self, name: &str) -> Self {
        self.globals.insert(name.to_ascii_lowercase());
        self
    }

    pub fn has_global(&self, name: &str) -> bool {
        self.globals.contains(&name.to_ascii_lowercase())
    }

    pub fn speech(&self) -> Option<&dyn SpeechSynthesis> {
        self.speech.as_deref()
    }

    pub fn speech_mut(&mut self) -> Option<&mut (dyn SpeechSynthesis + 'static)> {
        self.speech.as_deref_mut()
    }

    pub fn storage(&self) -> Option<&dyn PreferenceStore> {
        self.storage.as_deref()
    }

    pub fn storage_mut(&mut self) -> Option<&mut (dyn PreferenceStore + 'static)> {
        self.storage.as_deref_mut()
    }

    /// Voices offered by the speech engine (empty when unsupported)
    pub fn voices(&self) -> Vec<Voice> {
        self.speech().map(|s| s.voices()).unwrap_or_default()
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("navigator", &self.navigator)
            .field("globals", &self.globals)
            .field("speech", &self.speech.is_some())
            .field("storage", &self.storage.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new().with_entry("preferred-language", "ms");
        assert_eq!(store.get("preferred-language").as_deref(), Some("ms"));
        store.set("preferred-language", "ta").unwrap();
        assert_eq!(store.get("preferred-language").as_deref(), Some("ta"));
        store.remove("preferred-language");
        assert_eq!(store.get("preferred-language"), None);
    }

    #[test]
    fn test_speech_log_survives_move() {
        let speech = MemorySpeech::new(vec![Voice::new("Tingting", "zh-CN")]);
        let log = speech.log();
        let mut host = HostEnvironment::default().with_speech(speech);

        host.speech_mut().unwrap().speak(Utterance {
            text: "你好".into(),
            lang: "zh".into(),
            voice: None,
            rate: 1.0,
        });
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(host.voices().len(), 1);
    }

    #[test]
    fn test_missing_services() {
        let host = HostEnvironment::new(Navigator::new("Linux x86_64", "Mozilla/5.0"));
        assert!(host.speech().is_none());
        assert!(host.storage().is_none());
        assert!(host.voices().is_empty());
    }
}
