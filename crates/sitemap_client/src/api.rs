use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use sitemap_logging::{sitemap_debug, sitemap_info};
use url::Url;

use crate::filename::download_filename;
use crate::types::{CrawlRequest, ErrorBody};
use crate::{
    ApiError, CrawlAccepted, DownloadRequest, DownloadedFile, FailureKind, ProgressReport,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Root of the crawl service; endpoint paths are appended to it.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_download_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_download_bytes: 50 * 1024 * 1024,
        }
    }
}

/// The four endpoints of the crawl service.
#[async_trait::async_trait]
pub trait CrawlApi: Send + Sync {
    async fn start_crawl(&self, url: &str) -> Result<CrawlAccepted, ApiError>;

    async fn progress(&self, session_id: &str) -> Result<ProgressReport, ApiError>;

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadedFile, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestCrawlApi {
    settings: ClientSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestCrawlApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        let client = Self::build_client(&settings)?;
        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    fn build_client(settings: &ClientSettings) -> Result<reqwest::Client, ApiError> {
        reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))
    }

    /// Appends path segments to the base URL. Segments are percent-encoded,
    /// so a session id always stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl CrawlApi for ReqwestCrawlApi {
    async fn start_crawl(&self, url: &str) -> Result<CrawlAccepted, ApiError> {
        let endpoint = self.endpoint(&["crawl"])?;
        sitemap_debug!("POST {} url={}", endpoint, url);

        let response = self
            .client
            .post(endpoint)
            .json(&CrawlRequest { url })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let server_message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.error)
                .filter(|text| !text.is_empty());
            let message = server_message
                .clone()
                .unwrap_or_else(|| status.to_string());
            return Err(ApiError::new(
                FailureKind::Rejected {
                    status: status.as_u16(),
                    server_message,
                },
                message,
            ));
        }

        let mut accepted: CrawlAccepted = serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        if accepted.url.is_empty() {
            accepted.url = url.to_string();
        }
        sitemap_info!(
            "Crawl accepted session_id={} url={}",
            accepted.session_id,
            accepted.url
        );
        Ok(accepted)
    }

    async fn progress(&self, session_id: &str) -> Result<ProgressReport, ApiError> {
        let endpoint = self.endpoint(&["progress", session_id])?;
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        // The body is interpreted whatever the status; error answers carry the same shape.
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(|err| {
            ApiError::new(
                FailureKind::Decode,
                format!("progress answer ({status}) is not valid JSON: {err}"),
            )
        })
    }

    async fn download(&self, request: &DownloadRequest) -> Result<DownloadedFile, ApiError> {
        let endpoint = match request {
            DownloadRequest::Sitemap => self.endpoint(&["download"])?,
            DownloadRequest::Csv { session_id } => {
                self.endpoint(&["download-csv", session_id.as_str()])?
            }
        };
        sitemap_debug!("GET {}", endpoint);

        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| status.to_string());
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "download too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let filename = download_filename(disposition.as_deref(), request.default_filename());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "download too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(DownloadedFile {
            filename,
            content_type,
            bytes,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
