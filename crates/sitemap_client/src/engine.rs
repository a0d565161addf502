use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use sitemap_logging::{sitemap_debug, sitemap_info, sitemap_warn};
use tokio_util::sync::CancellationToken;

use crate::api::{ClientSettings, CrawlApi, ReqwestCrawlApi};
use crate::persist::AtomicFileWriter;
use crate::{ApiError, DownloadRequest, EngineEvent, FailureKind, Generation, SavedDownload};

#[derive(Clone)]
pub struct EngineConfig {
    pub client: ClientSettings,
    /// Directory downloads are written to.
    pub output_dir: PathBuf,
    /// Timestamp source for saved downloads.
    pub saved_utc: Arc<dyn Fn() -> String + Send + Sync>,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            client: ClientSettings::default(),
            output_dir,
            saved_utc: Arc::new(|| "1970-01-01T00:00:00Z".to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("http client: {0}")]
    Client(#[from] ApiError),
    #[error("could not start engine runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

enum EngineCommand {
    Submit {
        generation: Generation,
        url: String,
    },
    Schedule {
        generation: Generation,
        delay: Duration,
    },
    FetchProgress {
        generation: Generation,
        session_id: String,
    },
    Download(DownloadRequest),
}

impl EngineCommand {
    fn generation(&self) -> Option<Generation> {
        match self {
            EngineCommand::Submit { generation, .. }
            | EngineCommand::Schedule { generation, .. }
            | EngineCommand::FetchProgress { generation, .. } => Some(*generation),
            EngineCommand::Download(_) => None,
        }
    }
}

/// Runs crawl-service requests and poll timers on a background tokio runtime.
///
/// Only one generation is live at a time: submitting a new one cancels every
/// pending timer and request of the previous generation, and commands for an
/// older generation are dropped on arrival.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

struct Worker {
    api: Arc<dyn CrawlApi>,
    writer: AtomicFileWriter,
    saved_utc: Arc<dyn Fn() -> String + Send + Sync>,
}

struct LiveGeneration {
    generation: Generation,
    token: CancellationToken,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestCrawlApi::new(config.client.clone())?);
        Self::with_api(config, api)
    }

    /// Builds an engine around any `CrawlApi`; `config.client` is not used.
    pub fn with_api(config: EngineConfig, api: Arc<dyn CrawlApi>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new().map_err(EngineError::Runtime)?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let worker = Arc::new(Worker {
            api,
            writer: AtomicFileWriter::new(config.output_dir),
            saved_utc: config.saved_utc,
        });

        thread::Builder::new()
            .name("sitemap-engine".to_string())
            .spawn(move || {
                let mut live: Option<LiveGeneration> = None;
                while let Ok(command) = cmd_rx.recv() {
                    if let EngineCommand::Submit { generation, .. } = &command {
                        if let Some(previous) = live.take() {
                            sitemap_debug!("Cancelling generation {}", previous.generation);
                            previous.token.cancel();
                        }
                        live = Some(LiveGeneration {
                            generation: *generation,
                            token: CancellationToken::new(),
                        });
                    }

                    let token = match (command.generation(), live.as_ref()) {
                        (None, _) => CancellationToken::new(),
                        (Some(generation), Some(current)) if generation == current.generation => {
                            current.token.clone()
                        }
                        (Some(generation), _) => {
                            sitemap_debug!("Dropping command for stale generation {}", generation);
                            continue;
                        }
                    };

                    let worker = worker.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(worker.as_ref(), command, token, event_tx).await;
                    });
                }
            })
            .map_err(EngineError::Runtime)?;

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    /// Starts a new generation with `POST /crawl`, superseding the previous one.
    pub fn submit(&self, generation: Generation, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            generation,
            url: url.into(),
        });
    }

    /// Emits `EngineEvent::TimerElapsed` after `delay` unless the generation is superseded first.
    pub fn schedule(&self, generation: Generation, delay: Duration) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::Schedule { generation, delay });
    }

    pub fn fetch_progress(&self, generation: Generation, session_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchProgress {
            generation,
            session_id: session_id.into(),
        });
    }

    /// Downloads are not tied to a generation and are never cancelled.
    pub fn download(&self, request: DownloadRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Download(request));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    worker: &Worker,
    command: EngineCommand,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Submit { generation, url } => {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = worker.api.start_crawl(&url) => result,
            };
            if let Err(err) = &result {
                sitemap_warn!("Crawl submission failed for {}: {}", url, err);
            }
            EngineEvent::CrawlStarted { generation, result }
        }
        EngineCommand::Schedule { generation, delay } => {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            EngineEvent::TimerElapsed { generation }
        }
        EngineCommand::FetchProgress {
            generation,
            session_id,
        } => {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = worker.api.progress(&session_id) => result,
            };
            if let Err(err) = &result {
                sitemap_warn!("Progress request failed for {}: {}", session_id, err);
            }
            EngineEvent::ProgressFetched { generation, result }
        }
        EngineCommand::Download(request) => {
            let result = worker.download(&request).await;
            EngineEvent::DownloadCompleted { request, result }
        }
    };
    let _ = event_tx.send(event);
}

impl Worker {
    async fn download(&self, request: &DownloadRequest) -> Result<SavedDownload, ApiError> {
        let file = self.api.download(request).await?;
        let path = self
            .writer
            .write(&file.filename, &file.bytes)
            .map_err(|err| ApiError::new(FailureKind::Persist, err.to_string()))?;
        let saved = SavedDownload {
            path,
            byte_len: file.bytes.len() as u64,
            saved_utc: (self.saved_utc)(),
        };
        sitemap_info!(
            "Saved {:?} ({} bytes, {}) to {:?}",
            request,
            saved.byte_len,
            file.content_type.as_deref().unwrap_or("unknown type"),
            saved.path
        );
        Ok(saved)
    }
}
