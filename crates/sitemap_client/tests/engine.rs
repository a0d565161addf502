use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sitemap_client::{
    ApiError, CrawlAccepted, CrawlApi, DownloadRequest, DownloadedFile, EngineConfig,
    EngineEvent, EngineHandle, FailureKind, ProgressReport,
};
use tempfile::TempDir;

#[derive(Default)]
struct FakeApi {
    progress_calls: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl CrawlApi for FakeApi {
    async fn start_crawl(&self, url: &str) -> Result<CrawlAccepted, ApiError> {
        Ok(CrawlAccepted {
            session_id: format!("session-for-{url}"),
            url: url.to_string(),
            message: None,
        })
    }

    async fn progress(&self, session_id: &str) -> Result<ProgressReport, ApiError> {
        self.progress_calls
            .lock()
            .unwrap()
            .push(session_id.to_string());
        Ok(ProgressReport {
            crawled_urls: 1,
            visited_urls: vec!["http://example.com".to_string()],
            ..ProgressReport::default()
        })
    }

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadedFile, ApiError> {
        match request {
            DownloadRequest::Sitemap => Ok(DownloadedFile {
                filename: "sitemap.xml".to_string(),
                content_type: Some("application/xml".to_string()),
                bytes: b"<urlset/>".to_vec(),
            }),
            DownloadRequest::Csv { .. } => Err(ApiError {
                kind: FailureKind::HttpStatus(404),
                message: "CSV data not found".to_string(),
            }),
        }
    }
}

fn engine(dir: &TempDir, api: Arc<FakeApi>) -> EngineHandle {
    let mut config = EngineConfig::default_with_output(dir.path().to_path_buf());
    config.saved_utc = Arc::new(|| "2026-10-19T12:00:00Z".to_string());
    EngineHandle::with_api(config, api).expect("engine")
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    engine
        .recv_timeout(Duration::from_secs(5))
        .expect("engine event")
}

#[test]
fn submit_then_poll_round_trip() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(FakeApi::default());
    let engine = engine(&dir, api.clone());

    engine.submit(1, "http://example.com");
    match next_event(&engine) {
        EngineEvent::CrawlStarted { generation, result } => {
            assert_eq!(generation, 1);
            assert_eq!(result.unwrap().session_id, "session-for-http://example.com");
        }
        other => panic!("unexpected event {other:?}"),
    }

    let started = Instant::now();
    engine.schedule(1, Duration::from_millis(50));
    assert_eq!(next_event(&engine), EngineEvent::TimerElapsed { generation: 1 });
    assert!(started.elapsed() >= Duration::from_millis(50));

    engine.fetch_progress(1, "abc123");
    match next_event(&engine) {
        EngineEvent::ProgressFetched { generation, result } => {
            assert_eq!(generation, 1);
            assert_eq!(result.unwrap().crawled_urls, 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(*api.progress_calls.lock().unwrap(), vec!["abc123".to_string()]);
}

#[test]
fn new_submission_cancels_pending_timer() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir, Arc::new(FakeApi::default()));

    engine.submit(1, "http://a.example.com");
    let _ = next_event(&engine);
    engine.schedule(1, Duration::from_millis(300));

    engine.submit(2, "http://b.example.com");
    match next_event(&engine) {
        EngineEvent::CrawlStarted { generation, .. } => assert_eq!(generation, 2),
        other => panic!("unexpected event {other:?}"),
    }

    // The generation 1 timer would have fired by now.
    assert_eq!(engine.recv_timeout(Duration::from_millis(600)), None);
}

#[test]
fn commands_for_stale_generation_are_dropped() {
    let dir = TempDir::new().unwrap();
    let api = Arc::new(FakeApi::default());
    let engine = engine(&dir, api.clone());

    engine.submit(2, "http://example.com");
    let _ = next_event(&engine);

    engine.schedule(1, Duration::from_millis(10));
    engine.fetch_progress(1, "old");
    assert_eq!(engine.recv_timeout(Duration::from_millis(300)), None);
    assert!(api.progress_calls.lock().unwrap().is_empty());
}

#[test]
fn download_is_written_to_output_dir() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir, Arc::new(FakeApi::default()));

    engine.download(DownloadRequest::Sitemap);
    match next_event(&engine) {
        EngineEvent::DownloadCompleted { request, result } => {
            assert_eq!(request, DownloadRequest::Sitemap);
            let saved = result.expect("saved");
            assert_eq!(saved.path, dir.path().join("sitemap.xml"));
            assert_eq!(saved.byte_len, 9);
            assert_eq!(saved.saved_utc, "2026-10-19T12:00:00Z");
            assert_eq!(std::fs::read(&saved.path).unwrap(), b"<urlset/>");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn failed_download_reports_error() {
    let dir = TempDir::new().unwrap();
    let engine = engine(&dir, Arc::new(FakeApi::default()));

    engine.download(DownloadRequest::Csv {
        session_id: "abc123".to_string(),
    });
    match next_event(&engine) {
        EngineEvent::DownloadCompleted { result, .. } => {
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(404));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(!dir.path().join("sitemap_urls.csv").exists());
}
