use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// Submission counter supplied by the caller; the engine only compares it.
pub type Generation = u64;

/// Successful `POST /crawl` answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlAccepted {
    pub session_id: String,
    /// URL the server will crawl. Filled with the submitted URL when absent.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CrawlRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /progress/{id}` payload. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub crawled_urls: u64,
    #[serde(default)]
    pub total_urls: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visited_urls: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_details: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DownloadRequest {
    /// `GET /download`: the server's last generated sitemap.
    Sitemap,
    /// `GET /download-csv/{session_id}`.
    Csv { session_id: String },
}

impl DownloadRequest {
    pub fn default_filename(&self) -> &'static str {
        match self {
            DownloadRequest::Sitemap => "sitemap.xml",
            DownloadRequest::Csv { .. } => "sitemap_urls.csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDownload {
    pub path: PathBuf,
    pub byte_len: u64,
    pub saved_utc: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    CrawlStarted {
        generation: Generation,
        result: Result<CrawlAccepted, ApiError>,
    },
    TimerElapsed {
        generation: Generation,
    },
    ProgressFetched {
        generation: Generation,
        result: Result<ProgressReport, ApiError>,
    },
    DownloadCompleted {
        request: DownloadRequest,
        result: Result<SavedDownload, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Text the server put in its `error` field, if the request was rejected with one.
    pub fn server_message(&self) -> Option<&str> {
        match &self.kind {
            FailureKind::Rejected {
                server_message: Some(text),
                ..
            } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Non-2xx answer to `POST /crawl`.
    Rejected {
        status: u16,
        server_message: Option<String>,
    },
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Persist,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Rejected { status, .. } => write!(f, "request rejected ({status})"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "invalid response body"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Persist => write!(f, "could not save file"),
        }
    }
}
