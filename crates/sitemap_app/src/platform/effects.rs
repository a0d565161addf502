use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use sitemap_client::{
    ApiError, DownloadRequest, EngineConfig, EngineError, EngineEvent, EngineHandle,
    ProgressReport,
};
use sitemap_core::{DownloadKind, DownloadTarget, Effect, Msg, ProgressSnapshot};
use sitemap_logging::{sitemap_debug, sitemap_info, sitemap_warn};

use super::app::Inbox;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, inbox: mpsc::Sender<Inbox>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(config)?;
        let runner = Self { engine };
        runner.spawn_event_loop(inbox);
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitCrawl { generation, url } => {
                    sitemap_info!("SubmitCrawl generation={} url={}", generation, url);
                    self.engine.submit(generation, url);
                }
                Effect::SchedulePoll { generation, delay } => {
                    sitemap_debug!(
                        "SchedulePoll generation={} delay_ms={}",
                        generation,
                        delay.as_millis()
                    );
                    self.engine.schedule(generation, delay);
                }
                Effect::FetchProgress {
                    generation,
                    session_id,
                } => {
                    sitemap_debug!(
                        "FetchProgress generation={} session_id={}",
                        generation,
                        session_id
                    );
                    self.engine.fetch_progress(generation, session_id);
                }
                Effect::Download(target) => {
                    sitemap_info!("Download {:?}", target);
                    self.engine.download(map_target(target));
                }
            }
        }
    }

    fn spawn_event_loop(&self, inbox: mpsc::Sender<Inbox>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if inbox.send(Inbox::Msg(map_event(event))).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_target(target: DownloadTarget) -> DownloadRequest {
    match target {
        DownloadTarget::Sitemap => DownloadRequest::Sitemap,
        DownloadTarget::Csv { session_id } => DownloadRequest::Csv { session_id },
    }
}

fn map_download_kind(request: &DownloadRequest) -> DownloadKind {
    match request {
        DownloadRequest::Sitemap => DownloadKind::Sitemap,
        DownloadRequest::Csv { .. } => DownloadKind::Csv,
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CrawlStarted { generation, result } => match result {
            Ok(accepted) => Msg::CrawlAccepted {
                generation,
                session_id: accepted.session_id,
                url: accepted.url,
            },
            Err(err) => Msg::CrawlRejected {
                generation,
                reason: rejection_reason(&err),
            },
        },
        EngineEvent::TimerElapsed { generation } => Msg::PollDue { generation },
        EngineEvent::ProgressFetched { generation, result } => match result {
            Ok(report) => Msg::ProgressReceived {
                generation,
                snapshot: map_report(report),
            },
            Err(err) => Msg::ProgressFailed {
                generation,
                reason: err.to_string(),
            },
        },
        EngineEvent::DownloadCompleted { request, result } => {
            let kind = map_download_kind(&request);
            let result = match result {
                Ok(saved) => {
                    sitemap_info!(
                        "Download {:?} saved to {:?} at {}",
                        request,
                        saved.path,
                        saved.saved_utc
                    );
                    Ok(saved.path.display().to_string())
                }
                Err(err) => {
                    sitemap_warn!("Download {:?} failed: {}", request, err);
                    Err(err.to_string())
                }
            };
            Msg::DownloadFinished { kind, result }
        }
    }
}

/// A rejection without server text maps to `None` so the generic message is shown.
fn rejection_reason(err: &ApiError) -> Option<String> {
    match &err.kind {
        sitemap_client::FailureKind::Rejected { server_message, .. } => server_message.clone(),
        _ => Some(err.to_string()),
    }
}

fn map_report(report: ProgressReport) -> ProgressSnapshot {
    ProgressSnapshot {
        crawled_urls: report.crawled_urls,
        total_urls: report.total_urls,
        visited_urls: report.visited_urls,
        completed: report.completed,
        message: report.message,
        error: report.error,
        error_details: report.error_details,
    }
}
