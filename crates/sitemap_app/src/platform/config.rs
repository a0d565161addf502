//! Command line and RON configuration for the sitemap client.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use sitemap_client::{ClientSettings, EngineConfig};
use sitemap_core::{DownloadKind, PollTiming};
use sitemap_logging::LogDestination;

use super::ui::locale::Locale;

#[derive(Debug, Parser)]
#[command(
    name = "sitemap_app",
    version,
    about = "Submit a URL to a sitemap service, follow the crawl and download the results"
)]
pub struct Cli {
    /// URL to crawl. Without it, URLs are read line by line from stdin.
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Base URL of the sitemap service.
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Directory downloads are saved to.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// RON configuration file; command line flags take precedence.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub locale: Option<Locale>,

    #[arg(long, value_enum)]
    pub log: Option<LogTarget>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Download this result automatically once a crawl completes with URLs.
    #[arg(long = "download", value_enum, value_name = "KIND")]
    pub downloads: Vec<DownloadChoice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DownloadChoice {
    Sitemap,
    Csv,
}

impl From<DownloadChoice> for DownloadKind {
    fn from(choice: DownloadChoice) -> Self {
        match choice {
            DownloadChoice::Sitemap => DownloadKind::Sitemap,
            DownloadChoice::Csv => DownloadKind::Csv,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: String,
    pub output_dir: PathBuf,
    pub locale: Locale,
    pub log: LogTarget,
    pub log_file: Option<PathBuf>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_download_mb: u64,
    pub initial_delay_ms: u64,
    pub poll_interval_ms: u64,
    pub transient_retry_ms: u64,
    pub downloads: Vec<DownloadChoice>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let timing = PollTiming::default();
        Self {
            server: client.base_url,
            output_dir: PathBuf::from("downloads"),
            locale: Locale::default(),
            log: LogTarget::default(),
            log_file: None,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_download_mb: client.max_download_bytes / (1024 * 1024),
            initial_delay_ms: duration_ms(timing.initial_delay),
            poll_interval_ms: duration_ms(timing.poll_interval),
            transient_retry_ms: duration_ms(timing.transient_retry),
            downloads: Vec::new(),
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl AppConfig {
    /// Reads `path` if given, otherwise starts from defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_ron(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_ron(content: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Command line flags override file values.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(server) = &cli.server {
            self.server = server.clone();
        }
        if let Some(output_dir) = &cli.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(locale) = cli.locale {
            self.locale = locale;
        }
        if let Some(log) = cli.log {
            self.log = log;
        }
        if !cli.downloads.is_empty() {
            self.downloads = cli.downloads.clone();
        }
        self
    }

    pub fn poll_timing(&self) -> PollTiming {
        PollTiming {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            transient_retry: Duration::from_millis(self.transient_retry_ms),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default_with_output(self.output_dir.clone());
        config.client = ClientSettings {
            base_url: self.server.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_download_bytes: self.max_download_mb.saturating_mul(1024 * 1024),
        };
        config.saved_utc = Arc::new(|| Utc::now().to_rfc3339());
        config
    }

    pub fn auto_downloads(&self) -> Vec<DownloadKind> {
        self.downloads.iter().copied().map(DownloadKind::from).collect()
    }
}

pub fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
