use std::time::Duration;

use crate::view_model::{AppViewModel, DownloadStatus, Notice};
use crate::{DownloadKind, ProgressSnapshot};

/// Monotonic submission counter. Async results carrying an older value are stale.
pub type Generation = u64;

/// Opaque server-assigned crawl session id.
pub type SessionId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
}

impl Phase {
    /// The submit control is enabled exactly in these phases.
    pub fn accepts_submission(self) -> bool {
        matches!(self, Phase::Idle | Phase::Completed | Phase::Failed)
    }
}

/// Delays between polls. No backoff and no attempt limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTiming {
    /// Grace period between an accepted submission and the first poll.
    pub initial_delay: Duration,
    /// Steady interval while the crawl is running.
    pub poll_interval: Duration,
    /// Retry delay after a transient "not found" answer.
    pub transient_retry: Duration,
}

impl Default for PollTiming {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(1000),
            transient_retry: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    phase: Phase,
    generation: Generation,
    session: Option<SessionId>,
    notice: Notice,
    crawled_urls: u64,
    total_urls: Option<u64>,
    visited_urls: Vec<String>,
    results_visible: bool,
    downloads_visible: bool,
    last_download: Option<DownloadStatus>,
    timing: PollTiming,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timing(timing: PollTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            submit_enabled: self.phase.accepts_submission(),
            notice: self.notice.clone(),
            url_list: self.visited_urls.clone(),
            results_visible: self.results_visible,
            downloads_visible: self.downloads_visible,
            last_download: self.last_download.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn timing(&self) -> PollTiming {
        self.timing
    }

    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    pub(crate) fn downloads_visible(&self) -> bool {
        self.downloads_visible
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if text.is_empty() && self.results_visible {
            self.results_visible = false;
            self.dirty = true;
        }
        self.input = text;
    }

    /// Resets the result area for a fresh submission and returns its generation.
    pub(crate) fn begin_submission(&mut self) -> Generation {
        self.generation += 1;
        self.phase = Phase::Submitting;
        self.session = None;
        self.notice = Notice::Starting;
        self.crawled_urls = 0;
        self.total_urls = None;
        self.visited_urls.clear();
        self.results_visible = true;
        self.downloads_visible = false;
        self.last_download = None;
        self.dirty = true;
        self.generation
    }

    /// An empty id counts as no session; the first poll then stops with `NoActiveSession`.
    pub(crate) fn accept_session(&mut self, id: SessionId, url: String) {
        self.phase = Phase::Polling;
        self.notice = Notice::Started { url };
        self.session = Some(id).filter(|id| !id.is_empty());
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = notice;
        self.dirty = true;
    }

    /// Terminal failure: keep whatever was rendered, re-open submission.
    pub(crate) fn fail(&mut self, notice: Notice) {
        self.phase = Phase::Failed;
        self.set_notice(notice);
    }

    pub(crate) fn apply_progress(&mut self, snapshot: &ProgressSnapshot) {
        self.crawled_urls = snapshot.crawled_urls;
        self.total_urls = snapshot.total_urls;
        if !snapshot.visited_urls.is_empty() {
            self.visited_urls = snapshot.visited_urls.clone();
        }
        self.set_notice(Notice::Crawling {
            crawled: self.crawled_urls,
            total: self.total_urls.filter(|total| *total > 0),
        });
    }

    /// `found` reflects the final snapshot's URL list, not what was rendered before.
    pub(crate) fn complete(&mut self, found: bool) {
        self.phase = Phase::Completed;
        if found {
            self.downloads_visible = true;
            self.set_notice(Notice::Completed {
                crawled: self.crawled_urls,
            });
        } else {
            self.set_notice(Notice::NoUrlsFound);
        }
    }

    pub(crate) fn set_download_status(&mut self, status: DownloadStatus) {
        self.last_download = Some(status);
        self.dirty = true;
    }

    pub(crate) fn download_started(&mut self, kind: DownloadKind) {
        self.set_download_status(DownloadStatus::InProgress(kind));
    }
}
