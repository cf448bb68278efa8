//! Screen Reader Profiles
//!
//! Each known screen reader maps to a row in a strategy table that tunes
//! live-region roles, announcement pacing and heading focus targets.
//!
//! Detection is a best-effort heuristic. Browsers do not expose which
//! screen reader is running, so `Unknown` is the expected result in most
//! real sessions and must always behave sensibly.

use std::fmt;

use crate::host::HostEnvironment;

/// Known screen readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenReader {
    Nvda,
    Jaws,
    VoiceOver,
    #[default]
    Unknown,
}

/// Per-reader tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderProfile {
    /// `role` of polite live regions
    pub polite_role: &'static str,
    /// `role` of assertive live regions
    pub assertive_role: &'static str,
    /// Added to the inter-announcement delay
    pub extra_delay_ms: u64,
    /// Give headings `tabindex="-1"` during augmentation
    pub focusable_headings: bool,
    /// Value of `aria-atomic` on live regions
    pub atomic_regions: bool,
}

const DEFAULT_PROFILE: ReaderProfile = ReaderProfile {
    polite_role: "status",
    assertive_role: "alert",
    extra_delay_ms: 0,
    focusable_headings: true,
    atomic_regions: true,
};

static PROFILES: [(ScreenReader, ReaderProfile); 4] = [
    (ScreenReader::Nvda, DEFAULT_PROFILE),
    // JAWS drops live-region updates that arrive back to back
    (ScreenReader::Jaws, ReaderProfile { extra_delay_ms: 250, ..DEFAULT_PROFILE }),
    // VoiceOver's rotor reaches headings without a tabindex
    (ScreenReader::VoiceOver, ReaderProfile { extra_delay_ms: 100, focusable_headings: false, ..DEFAULT_PROFILE }),
    (ScreenReader::Unknown, DEFAULT_PROFILE),
];

impl ScreenReader {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nvda => "NVDA",
            Self::Jaws => "JAWS",
            Self::VoiceOver => "VoiceOver",
            Self::Unknown => "unknown",
        }
    }

    pub fn profile(&self) -> &'static ReaderProfile {
        PROFILES
            .iter()
            .find(|(reader, _)| reader == self)
            .map(|(_, profile)| profile)
            .unwrap_or(&DEFAULT_PROFILE)
    }

    /// Guess the active screen reader from host globals, user agent and
    /// platform.
    pub fn detect(host: &HostEnvironment) -> Self {
        let ua = host.navigator.user_agent.to_ascii_lowercase();
        let platform = host.navigator.platform.to_ascii_lowercase();

        if host.has_global("nvda") || ua.contains("nvda") {
            Self::Nvda
        } else if host.has_global("jaws") || ua.contains("jaws") || ua.contains("freedom scientific") {
            Self::Jaws
        } else if platform.starts_with("mac") || platform.contains("iphone") || platform.contains("ipad") {
            Self::VoiceOver
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for ScreenReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
