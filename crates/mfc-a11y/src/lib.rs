//! Clinic Accessibility Runtime
//!
//! Keyboard, focus, announcement and language services for the clinic
//! web app, driven against the `mfc-dom` UI tree.
//!
//! Features:
//! - Shortcut registry with first-match dispatch and universal navigation keys
//! - Focus trapping with Tab wrap-around, plus named focus save/restore
//! - Sequential live-region announcement queue on a virtual clock
//! - Language state (en, zh, ms, ta) with cultural formatting and voice selection
//! - Screen-reader profiles and best-effort assistive technology detection
//! - Landmark augmentation and skip links

pub mod announcer;
pub mod aria;
pub mod capabilities;
pub mod config;
pub mod focus;
pub mod host;
pub mod landmarks;
pub mod language;
pub mod localization;
pub mod runtime;
pub mod screen_reader;
pub mod shortcuts;
pub mod timers;

use std::path::PathBuf;

pub use announcer::{Announcement, AnnouncementId, Announcer, AnnouncerTiming, EmittedAnnouncement, LiveRegionHost};
pub use aria::{AriaRole, Politeness};
pub use capabilities::{AssistiveCapabilities, PlatformKind, Support};
pub use config::RuntimeConfig;
pub use focus::{FocusHistory, FocusTrap, FocusTrapStack, DEFAULT_FOCUS_KEY};
pub use host::{HostEnvironment, MemorySpeech, MemoryStore, Navigator, PreferenceStore, SpeechSynthesis, Utterance, Voice};
pub use language::{CulturalFormat, CurrencyPosition, Language, LanguageState, TextDirection};
pub use localization::{LocalizedText, TextRegistry};
pub use runtime::AccessibilityRuntime;
pub use screen_reader::{ReaderProfile, ScreenReader};
pub use shortcuts::{DispatchOutcome, ShortcutBinding, ShortcutRegistry, ShortcutSignature, UniversalNav};
pub use timers::{TimerId, TimerQueue};

/// Accessibility runtime error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Preference storage unavailable: {0}")]
    Storage(String),

    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid text bundle: {0}")]
    TextBundle(#[from] serde_json::Error),

    #[error(transparent)]
    Dom(#[from] mfc_dom::DomError),
}
