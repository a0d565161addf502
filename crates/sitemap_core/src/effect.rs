use std::time::Duration;

use crate::{Generation, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `POST /crawl` for `url`. Starting a new generation supersedes any older loop.
    SubmitCrawl { generation: Generation, url: String },
    /// Deliver `Msg::PollDue` for `generation` after `delay`.
    SchedulePoll {
        generation: Generation,
        delay: Duration,
    },
    /// `GET /progress/{session_id}`.
    FetchProgress {
        generation: Generation,
        session_id: SessionId,
    },
    /// Fetch a result file and save it locally.
    Download(DownloadTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadTarget {
    /// Session-less sitemap; the server serves its last completed run.
    Sitemap,
    Csv { session_id: SessionId },
}
