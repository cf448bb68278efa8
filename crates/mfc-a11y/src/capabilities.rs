//! Capability Detection
//!
//! Probes the host once at start-up. A failed probe is recorded as
//! `Unsupported`; nothing here returns an error.

use crate::host::HostEnvironment;
use crate::screen_reader::ScreenReader;

/// Probe result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Support {
    Supported,
    #[default]
    Unsupported,
}

impl Support {
    pub fn from_bool(supported: bool) -> Self {
        if supported { Self::Supported } else { Self::Unsupported }
    }

    pub fn is_supported(&self) -> bool {
        *self == Self::Supported
    }
}

/// Platform family from `navigator.platform` / user agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformKind {
    Windows,
    Mac,
    Linux,
    Ios,
    Android,
    #[default]
    Unknown,
}

impl PlatformKind {
    pub fn detect(platform: &str, user_agent: &str) -> Self {
        let platform = platform.to_ascii_lowercase();
        let ua = user_agent.to_ascii_lowercase();
        if platform.contains("iphone") || platform.contains("ipad") {
            Self::Ios
        } else if ua.contains("android") {
            Self::Android
        } else if platform.starts_with("win") {
            Self::Windows
        } else if platform.starts_with("mac") {
            Self::Mac
        } else if platform.contains("linux") {
            Self::Linux
        } else {
            Self::Unknown
        }
    }
}

/// What the host offers to assistive technology users
#[derive(Debug, Clone, Default)]
pub struct AssistiveCapabilities {
    pub screen_reader: ScreenReader,
    pub platform: PlatformKind,
    pub speech_synthesis: Support,
    pub storage: Support,
    pub voice_count: usize,
}

impl AssistiveCapabilities {
    pub fn detect(host: &HostEnvironment) -> Self {
        let voice_count = host.voices().len();
        let caps = Self {
            screen_reader: ScreenReader::detect(host),
            platform: PlatformKind::detect(&host.navigator.platform, &host.navigator.user_agent),
            speech_synthesis: Support::from_bool(host.speech().is_some()),
            storage: Support::from_bool(host.storage().is_some()),
            voice_count,
        };
        tracing::debug!(
            screen_reader = %caps.screen_reader,
            platform = ?caps.platform,
            speech = ?caps.speech_synthesis,
            storage = ?caps.storage,
            voices = voice_count,
            "assistive capabilities detected"
        );
        caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemorySpeech, MemoryStore, Navigator, Voice};

    #[test]
    fn test_platform_detect() {
        assert_eq!(PlatformKind::detect("Win32", ""), PlatformKind::Windows);
        assert_eq!(PlatformKind::detect("iPhone", ""), PlatformKind::Ios);
        assert_eq!(PlatformKind::detect("Linux armv8l", "Mozilla/5.0 (Linux; Android 14)"), PlatformKind::Android);
        assert_eq!(PlatformKind::detect("", ""), PlatformKind::Unknown);
    }

    #[test]
    fn test_unsupported_degrades() {
        let caps = AssistiveCapabilities::detect(&HostEnvironment::default());
        assert_eq!(caps.speech_synthesis, Support::Unsupported);
        assert_eq!(caps.storage, Support::Unsupported);
        assert_eq!(caps.voice_count, 0);
    }

    #[test]
    fn test_supported() {
        let host = HostEnvironment::new(Navigator::new("MacIntel", "Mozilla/5.0"))
            .with_speech(MemorySpeech::new(vec![Voice::new("Karen", "en-AU")]))
            .with_storage(MemoryStore::new());
        let caps = AssistiveCapabilities::detect(&host);
        assert!(caps.speech_synthesis.is_supported());
        assert!(caps.storage.is_supported());
        assert_eq!(caps.platform, PlatformKind::Mac);
        assert_eq!(caps.screen_reader, ScreenReader::VoiceOver);
        assert_eq!(caps.voice_count, 1);
    }
}
