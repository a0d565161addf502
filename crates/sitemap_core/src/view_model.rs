use crate::{DownloadKind, Phase};

/// What the progress area should say. Text is chosen by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Notice {
    #[default]
    None,
    /// Submission sent, waiting for the server.
    Starting,
    /// Server accepted; echoes the URL it will crawl.
    Started { url: String },
    /// Session not visible yet, polling again.
    Restarting,
    Crawling { crawled: u64, total: Option<u64> },
    Completed { crawled: u64 },
    /// Crawl finished without a single URL.
    NoUrlsFound,
    SessionError {
        error: String,
        details: Option<String>,
    },
    /// Submission failed; `None` means fall back to the generic message.
    RequestFailed { reason: Option<String> },
    PollFailed,
    NoActiveSession,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    InProgress(DownloadKind),
    Saved { kind: DownloadKind, path: String },
    Failed { kind: DownloadKind, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub submit_enabled: bool,
    pub notice: Notice,
    pub url_list: Vec<String>,
    pub results_visible: bool,
    pub downloads_visible: bool,
    pub last_download: Option<DownloadStatus>,
    pub dirty: bool,
}
