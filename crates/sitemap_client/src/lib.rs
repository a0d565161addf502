//! Sitemap client: HTTP access to the crawl service and effect execution.
mod api;
mod engine;
mod filename;
mod persist;
mod types;

pub use api::{ClientSettings, CrawlApi, ReqwestCrawlApi};
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use filename::download_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    ApiError, CrawlAccepted, DownloadRequest, DownloadedFile, EngineEvent, FailureKind,
    Generation, ProgressReport, SavedDownload,
};
