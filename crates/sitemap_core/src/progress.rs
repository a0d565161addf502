//! Progress snapshot and the rules that decide what a poll response means.

/// Error text the server uses for unknown sessions. It is not fatal: the
/// accompanying `message` marks the response as a transient miss.
pub const SESSION_EXPIRED_SENTINEL: &str = "Session expired or not found";

const NOT_FOUND_MARKER: &str = "not found";

/// Point-in-time status returned by `GET /progress/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub crawled_urls: u64,
    pub total_urls: Option<u64>,
    pub visited_urls: Vec<String>,
    pub completed: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub error_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Session-level failure; polling stops.
    Fatal {
        error: String,
        details: Option<String>,
    },
    /// Session not visible server-side yet; retry later.
    Transient,
    /// Regular progress update.
    Progress { completed: bool },
}

/// Classifies a snapshot. Order matters: a real error wins over a
/// "not found" message, and the sentinel error never counts as fatal.
pub fn classify_progress(snapshot: &ProgressSnapshot) -> PollOutcome {
    if let Some(error) = non_empty(snapshot.error.as_deref()) {
        if error != SESSION_EXPIRED_SENTINEL {
            return PollOutcome::Fatal {
                error: error.to_string(),
                details: non_empty(snapshot.error_details.as_deref()).map(ToOwned::to_owned),
            };
        }
    }

    if snapshot
        .message
        .as_deref()
        .is_some_and(|message| message.contains(NOT_FOUND_MARKER))
    {
        return PollOutcome::Transient;
    }

    PollOutcome::Progress {
        completed: snapshot.completed,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
