use crate::{Generation, ProgressSnapshot, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input.
    InputChanged(String),
    /// User submitted the current URL input.
    Submitted,
    /// Server accepted the crawl request.
    CrawlAccepted {
        generation: Generation,
        session_id: SessionId,
        url: String,
    },
    /// Crawl request failed: non-OK status, network or parse error.
    /// `reason` is `None` when the server gave no usable message.
    CrawlRejected {
        generation: Generation,
        reason: Option<String>,
    },
    /// A scheduled poll timer elapsed.
    PollDue { generation: Generation },
    /// Progress endpoint answered with a parsable snapshot.
    ProgressReceived {
        generation: Generation,
        snapshot: ProgressSnapshot,
    },
    /// Progress request failed at the network or parse level.
    ProgressFailed {
        generation: Generation,
        reason: String,
    },
    /// User clicked one of the download controls.
    DownloadClicked(DownloadKind),
    /// Engine finished a download.
    DownloadFinished {
        kind: DownloadKind,
        result: Result<String, String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadKind {
    Sitemap,
    Csv,
}
