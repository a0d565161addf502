use crate::view_model::{DownloadStatus, Notice};
use crate::{
    classify_progress, AppState, DownloadKind, DownloadTarget, Effect, Msg, Phase, PollOutcome,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages tagged with a generation other than the current one belong to a
/// superseded submission and leave the state untouched.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::Submitted => {
            let url = state.input().trim().to_string();
            if url.is_empty() || !state.phase().accepts_submission() {
                return (state, Vec::new());
            }
            let generation = state.begin_submission();
            vec![Effect::SubmitCrawl { generation, url }]
        }
        Msg::CrawlAccepted {
            generation,
            session_id,
            url,
        } => {
            if !state.is_current(generation) || state.phase() != Phase::Submitting {
                return (state, Vec::new());
            }
            state.accept_session(session_id, url);
            vec![Effect::SchedulePoll {
                generation,
                delay: state.timing().initial_delay,
            }]
        }
        Msg::CrawlRejected { generation, reason } => {
            if !state.is_current(generation) || state.phase() != Phase::Submitting {
                return (state, Vec::new());
            }
            state.fail(Notice::RequestFailed {
                reason: reason.filter(|text| !text.is_empty()),
            });
            Vec::new()
        }
        Msg::PollDue { generation } => {
            if !state.is_current(generation) || state.phase() != Phase::Polling {
                return (state, Vec::new());
            }
            match state.session_id().map(ToOwned::to_owned) {
                Some(session_id) => vec![Effect::FetchProgress {
                    generation,
                    session_id,
                }],
                None => {
                    state.fail(Notice::NoActiveSession);
                    Vec::new()
                }
            }
        }
        Msg::ProgressReceived {
            generation,
            snapshot,
        } => {
            if !state.is_current(generation) || state.phase() != Phase::Polling {
                return (state, Vec::new());
            }
            match classify_progress(&snapshot) {
                PollOutcome::Fatal { error, details } => {
                    state.fail(Notice::SessionError { error, details });
                    Vec::new()
                }
                PollOutcome::Transient => {
                    state.set_notice(Notice::Restarting);
                    vec![Effect::SchedulePoll {
                        generation,
                        delay: state.timing().transient_retry,
                    }]
                }
                PollOutcome::Progress { completed } => {
                    state.apply_progress(&snapshot);
                    if completed {
                        state.complete(!snapshot.visited_urls.is_empty());
                        Vec::new()
                    } else {
                        vec![Effect::SchedulePoll {
                            generation,
                            delay: state.timing().poll_interval,
                        }]
                    }
                }
            }
        }
        Msg::ProgressFailed { generation, .. } => {
            if !state.is_current(generation) || state.phase() != Phase::Polling {
                return (state, Vec::new());
            }
            state.fail(Notice::PollFailed);
            Vec::new()
        }
        Msg::DownloadClicked(kind) => {
            if !state.downloads_visible() {
                return (state, Vec::new());
            }
            let target = match kind {
                DownloadKind::Sitemap => DownloadTarget::Sitemap,
                DownloadKind::Csv => match state.session_id().map(ToOwned::to_owned) {
                    Some(session_id) => DownloadTarget::Csv { session_id },
                    None => return (state, Vec::new()),
                },
            };
            state.download_started(kind);
            vec![Effect::Download(target)]
        }
        Msg::DownloadFinished { kind, result } => {
            let status = match result {
                Ok(path) => DownloadStatus::Saved { kind, path },
                Err(reason) => DownloadStatus::Failed { kind, reason },
            };
            state.set_download_status(status);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
