//! Screen Reader Announcements
//!
//! FIFO announcement queue emitted through transient live regions.
//!
//! Exactly one region is in flight at a time: an announcement's region
//! is created, left in place for `region_lifetime_ms`, removed, and the
//! next item is only taken after `inter_announcement_delay_ms`.

use std::collections::VecDeque;
use std::fmt;

use mfc_dom::{Document, NodeId};

use crate::aria::Politeness;
use crate::screen_reader::{ReaderProfile, ScreenReader};
use crate::timers::TimerQueue;

/// Class that visually hides live regions
pub const LIVE_REGION_CLASS: &str = "sr-only";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnouncementId(u64);

impl fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "announcement-{}", self.0)
    }
}

/// Queued announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub category: String,
    pub priority: Politeness,
    pub text: String,
    /// Virtual time of `announce` (ms)
    pub created_at: u64,
    /// Dropped instead of emitted once older than this
    pub ttl_ms: Option<u64>,
}

impl Announcement {
    pub fn is_expired(&self, now: u64) -> bool {
        self.ttl_ms.is_some_and(|ttl| now.saturating_sub(self.created_at) > ttl)
    }
}

/// Where live regions are created and removed
pub trait LiveRegionHost {
    /// Insert a live region carrying the announcement text. `None` when
    /// there is nowhere to put it.
    fn create_region(&mut self, announcement: &Announcement, profile: &ReaderProfile) -> Option<NodeId>;

    /// Remove a region; `false` if it was already gone.
    fn remove_region(&mut self, region: NodeId) -> bool;
}

impl LiveRegionHost for Document {
    fn create_region(&mut self, announcement: &Announcement, profile: &ReaderProfile) -> Option<NodeId> {
        let body = self.body();
        self.tree.element(body)?;

        let role = match announcement.priority {
            Politeness::Polite => profile.polite_role,
            Politeness::Assertive => profile.assertive_role,
        };
        let attrs = [
            ("aria-live", announcement.priority.as_str()),
            ("aria-atomic", if profile.atomic_regions { "true" } else { "false" }),
            ("role", role),
            ("class", LIVE_REGION_CLASS),
            ("data-announcement-category", announcement.category.as_str()),
        ];

        let region = self.tree.create_element("div");
        for (name, value) in attrs {
            self.tree.set_attribute(region, name, value).ok()?;
        }
        self.tree.append_child(body, region).ok()?;
        self.tree.set_text_content(region, &announcement.text).ok()?;
        Some(region)
    }

    fn remove_region(&mut self, region: NodeId) -> bool {
        self.tree.is_connected(region) && self.tree.detach(region)
    }
}

/// Pacing constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncerTiming {
    pub region_lifetime_ms: u64,
    pub inter_announcement_delay_ms: u64,
}

impl Default for AnnouncerTiming {
    fn default() -> Self {
        Self {
            region_lifetime_ms: 1_000,
            inter_announcement_delay_ms: 500,
        }
    }
}

/// Record of an emitted announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedAnnouncement {
    pub id: AnnouncementId,
    pub category: String,
    pub priority: Politeness,
    pub text: String,
    pub region: NodeId,
    pub emitted_at: u64,
    pub removed_at: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnnouncerTask {
    RemoveRegion { id: AnnouncementId, region: NodeId },
    ProcessNext,
}

/// Sequential announcement emitter
#[derive(Debug)]
pub struct Announcer {
    queue: VecDeque<Announcement>,
    timers: TimerQueue<AnnouncerTask>,
    timing: AnnouncerTiming,
    profile: &'static ReaderProfile,
    next_id: u64,
    processing: bool,
    in_flight: Option<AnnouncementId>,
    history: Vec<EmittedAnnouncement>,
    max_history: usize,
    /// Emitted since the last `take_emitted`
    fresh: Vec<Announcement>,
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new(AnnouncerTiming::default())
    }
}

impl Announcer {
    pub fn new(timing: AnnouncerTiming) -> Self {
        Self {
            queue: VecDeque::new(),
            timers: TimerQueue::new(),
            timing,
            profile: ScreenReader::Unknown.profile(),
            next_id: 1,
            processing: false,
            in_flight: None,
            history: Vec::new(),
            max_history: 100,
            fresh: Vec::new(),
        }
    }

    pub fn set_profile(&mut self, profile: &'static ReaderProfile) {
        self.profile = profile;
    }

    pub fn timing(&self) -> AnnouncerTiming {
        self.timing
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    /// Queue an announcement; emits it immediately when idle.
    pub fn announce<H: LiveRegionHost + ?Sized>(
        &mut self,
        host: &mut H,
        text: &str,
        category: &str,
        priority: Politeness,
        ttl_ms: Option<u64>,
    ) -> AnnouncementId {
        let id = AnnouncementId(self.next_id);
        self.next_id += 1;
        self.queue.push_back(Announcement {
            id,
            category: category.to_string(),
            priority,
            text: text.to_string(),
            created_at: self.now(),
            ttl_ms,
        });
        tracing::debug!(%id, category, %priority, queued = self.queue.len(), "announcement queued");

        if !self.processing {
            self.process_next(host);
        }
        id
    }

    fn process_next<H: LiveRegionHost + ?Sized>(&mut self, host: &mut H) {
        let now = self.now();
        while let Some(announcement) = self.queue.pop_front() {
            if announcement.is_expired(now) {
                tracing::debug!(id = %announcement.id, "announcement expired before emission");
                continue;
            }
            let Some(region) = host.create_region(&announcement, self.profile) else {
                tracing::debug!(id = %announcement.id, "no live region host, dropping announcement");
                continue;
            };

            self.timers.set_timeout(
                self.timing.region_lifetime_ms,
                AnnouncerTask::RemoveRegion { id: announcement.id, region },
            );
            self.processing = true;
            self.in_flight = Some(announcement.id);
            self.record(EmittedAnnouncement {
                id: announcement.id,
                category: announcement.category.clone(),
                priority: announcement.priority,
                text: announcement.text.clone(),
                region,
                emitted_at: now,
                removed_at: None,
            });
            tracing::debug!(id = %announcement.id, region = %region, "announcement emitted");
            self.fresh.push(announcement);
            return;
        }
        self.processing = false;
    }

    fn record(&mut self, emitted: EmittedAnnouncement) {
        self.history.push(emitted);
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }
    }

    /// Advance the virtual clock, running region removals and queue
    /// steps that fall due.
    pub fn advance<H: LiveRegionHost + ?Sized>(&mut self, host: &mut H, elapsed_ms: u64) {
        let deadline = self.now().saturating_add(elapsed_ms);
        while let Some(task) = self.timers.pop_due(deadline) {
            match task {
                AnnouncerTask::RemoveRegion { id, region } => {
                    if !host.remove_region(region) {
                        tracing::debug!(%id, "live region already removed");
                    }
                    let now = self.now();
                    if let Some(entry) = self.history.iter_mut().rev().find(|e| e.id == id) {
                        entry.removed_at = Some(now);
                    }
                    self.in_flight = None;
                    self.timers.set_timeout(
                        self.timing.inter_announcement_delay_ms + self.profile.extra_delay_ms,
                        AnnouncerTask::ProcessNext,
                    );
                }
                AnnouncerTask::ProcessNext => self.process_next(host),
            }
        }
        self.timers.advance_to(deadline);
    }

    /// Run timers until everything queued has been emitted and removed
    pub fn flush<H: LiveRegionHost + ?Sized>(&mut self, host: &mut H) {
        while let Some(wait) = self.timers.time_until_next() {
            self.advance(host, wait);
        }
    }

    /// Announcements emitted since the last call
    pub fn take_emitted(&mut self) -> Vec<Announcement> {
        std::mem::take(&mut self.fresh)
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn in_flight(&self) -> Option<AnnouncementId> {
        self.in_flight
    }

    /// Items waiting behind the one in flight
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn history(&self) -> &[EmittedAnnouncement] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records region text changes and removals in order
    struct Recorder {
        doc: Document,
        log: Vec<String>,
    }

    impl LiveRegionHost for Recorder {
        fn create_region(&mut self, announcement: &Announcement, profile: &ReaderProfile) -> Option<NodeId> {
            let region = self.doc.create_region(announcement, profile)?;
            self.log.push(format!("set {}", announcement.text));
            Some(region)
        }

        fn remove_region(&mut self, region: NodeId) -> bool {
            let text = self.doc.tree.text_content(region);
            let removed = self.doc.remove_region(region);
            self.log.push(format!("remove {text}"));
            removed
        }
    }

    fn recorder() -> Recorder {
        Recorder { doc: Document::default(), log: Vec::new() }
    }

    #[test]
    fn test_fifo_single_in_flight() {
        let mut host = recorder();
        let mut announcer = Announcer::default();
        let a = announcer.announce(&mut host, "A", "test", Politeness::Polite, None);
        announcer.announce(&mut host, "B", "test", Politeness::Polite, None);

        assert_eq!(announcer.in_flight(), Some(a));
        assert_eq!(announcer.pending(), 1);
        assert_eq!(host.log, vec!["set A"]);

        announcer.advance(&mut host, 1_000);
        assert_eq!(host.log, vec!["set A", "remove A"]);

        // Inter-announcement gap
        announcer.advance(&mut host, 499);
        assert_eq!(host.log.len(), 2);
        announcer.advance(&mut host, 1);
        assert_eq!(host.log, vec!["set A", "remove A", "set B"]);

        announcer.flush(&mut host);
        assert_eq!(host.log, vec!["set A", "remove A", "set B", "remove B"]);
        assert!(!announcer.is_processing());
    }

    #[test]
    fn test_region_attributes() {
        let mut doc = Document::default();
        let mut announcer = Announcer::default();
        announcer.announce(&mut doc, "Appointment saved", "booking", Politeness::Assertive, None);

        let region = announcer.history()[0].region;
        assert_eq!(doc.tree.attribute(region, "aria-live"), Some("assertive"));
        assert_eq!(doc.tree.attribute(region, "role"), Some("alert"));
        assert_eq!(doc.tree.attribute(region, "aria-atomic"), Some("true"));
        assert!(doc.tree.has_class(region, LIVE_REGION_CLASS));
        assert_eq!(doc.tree.text_content(region), "Appointment saved");

        announcer.advance(&mut doc, 1_000);
        assert!(!doc.tree.is_connected(region));
        assert_eq!(announcer.history()[0].removed_at, Some(1_000));
    }

    #[test]
    fn test_removal_tolerates_detached_region() {
        let mut doc = Document::default();
        let mut announcer = Announcer::default();
        announcer.announce(&mut doc, "Navigating away", "nav", Politeness::Polite, None);
        let region = announcer.history()[0].region;

        doc.tree.detach(region);
        announcer.advance(&mut doc, 1_000);
        assert_eq!(announcer.in_flight(), None);
    }

    #[test]
    fn test_ttl_expiry() {
        let mut doc = Document::default();
        let mut announcer = Announcer::default();
        announcer.announce(&mut doc, "first", "test", Politeness::Polite, None);
        announcer.announce(&mut doc, "stale", "test", Politeness::Polite, Some(200));
        announcer.announce(&mut doc, "last", "test", Politeness::Polite, None);

        announcer.flush(&mut doc);
        let texts: Vec<&str> = announcer.history().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "last"]);
    }

    #[test]
    fn test_no_body_is_noop() {
        let mut doc = Document::empty("about:blank");
        let mut announcer = Announcer::default();
        announcer.announce(&mut doc, "lost", "test", Politeness::Polite, None);
        assert!(!announcer.is_processing());
        assert!(announcer.history().is_empty());
    }

    #[test]
    fn test_profile_delay() {
        let mut host = recorder();
        let mut announcer = Announcer::default();
        announcer.set_profile(ScreenReader::Jaws.profile());
        announcer.announce(&mut host, "A", "test", Politeness::Polite, None);
        announcer.announce(&mut host, "B", "test", Politeness::Polite, None);

        announcer.advance(&mut host, 1_500);
        assert_eq!(host.log.len(), 2);
        announcer.advance(&mut host, 250);
        assert_eq!(host.log.last().map(String::as_str), Some("set B"));
    }
}
