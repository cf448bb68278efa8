//! Runtime Configuration
//!
//! TOML configuration; every field has a default so a partial file (or
//! none at all) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::announcer::AnnouncerTiming;
use crate::language::Language;
use crate::A11yError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// How long a live region stays in the document (ms)
    pub region_lifetime_ms: u64,
    /// Pause between one region's removal and the next announcement (ms)
    pub inter_announcement_delay_ms: u64,
    /// Announce shortcut descriptions when they fire
    pub announce_shortcuts: bool,
    /// Also speak emitted announcements through speech synthesis
    pub speak_announcements: bool,
    /// Language used until a stored preference is restored
    pub default_language: Language,
    /// Preference storage key for the chosen language
    pub language_storage_key: String,
    /// Insert a "skip to main content" link at start-up
    pub skip_links: bool,
    /// Add implicit landmark roles and heading focus targets at start-up
    pub augment_landmarks: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let timing = AnnouncerTiming::default();
        Self {
            region_lifetime_ms: timing.region_lifetime_ms,
            inter_announcement_delay_ms: timing.inter_announcement_delay_ms,
            announce_shortcuts: true,
            speak_announcements: false,
            default_language: Language::En,
            language_storage_key: "preferred-language".to_string(),
            skip_links: true,
            augment_landmarks: true,
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, A11yError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, A11yError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| A11yError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "runtime config loaded");
        Ok(config)
    }

    pub fn timing(&self) -> AnnouncerTiming {
        AnnouncerTiming {
            region_lifetime_ms: self.region_lifetime_ms,
            inter_announcement_delay_ms: self.inter_announcement_delay_ms,
        }
    }
}
