use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sitemap_core::{DownloadKind, DownloadStatus, Notice};

use super::MessageSeverity;

/// Language of the user-facing texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    #[value(name = "en")]
    English,
    #[serde(rename = "tr")]
    #[value(name = "tr")]
    Turkish,
}

/// Rendered form of a `Notice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeText {
    pub text: String,
    pub severity: MessageSeverity,
    pub detail: Option<String>,
}

impl NoticeText {
    fn info(text: String) -> Self {
        Self {
            text,
            severity: MessageSeverity::Information,
            detail: None,
        }
    }

    fn warning(text: String) -> Self {
        Self {
            severity: MessageSeverity::Warning,
            ..Self::info(text)
        }
    }

    fn error(text: String) -> Self {
        Self {
            severity: MessageSeverity::Error,
            ..Self::info(text)
        }
    }
}

impl Locale {
    pub fn title(self) -> &'static str {
        match self {
            Locale::English => "Sitemap generator",
            Locale::Turkish => "Sitemap oluşturucu",
        }
    }

    pub fn input_hint(self) -> &'static str {
        match self {
            Locale::English => {
                "Enter a URL to crawl. Empty line clears, :sitemap / :csv download, :quit exits."
            }
            Locale::Turkish => {
                "Taranacak URL'yi girin. Boş satır temizler, :sitemap / :csv indirir, :quit çıkar."
            }
        }
    }

    pub fn submit_label(self, enabled: bool) -> &'static str {
        match (self, enabled) {
            (Locale::English, true) => "Generate Sitemap",
            (Locale::English, false) => "Processing...",
            (Locale::Turkish, true) => "Sitemap Oluştur",
            (Locale::Turkish, false) => "İşleniyor...",
        }
    }

    pub fn list_heading(self) -> &'static str {
        match self {
            Locale::English => "Crawled URLs:",
            Locale::Turkish => "Taranan URL'ler:",
        }
    }

    pub fn download_label(self, kind: DownloadKind) -> &'static str {
        match (self, kind) {
            (Locale::English, DownloadKind::Sitemap) => "Download sitemap (XML) with :sitemap",
            (Locale::English, DownloadKind::Csv) => "Download URL list (CSV) with :csv",
            (Locale::Turkish, DownloadKind::Sitemap) => "Sitemap indir (XML): :sitemap",
            (Locale::Turkish, DownloadKind::Csv) => "URL listesini indir (CSV): :csv",
        }
    }

    pub fn notice(self, notice: &Notice) -> NoticeText {
        let english = self == Locale::English;
        match notice {
            Notice::None => NoticeText::info(String::new()),
            Notice::Starting => NoticeText::info(if english {
                "Starting crawl...".to_string()
            } else {
                "Tarama başlatılıyor...".to_string()
            }),
            Notice::Started { url } => NoticeText::info(if english {
                format!("Crawl started: {url}")
            } else {
                format!("Tarama başlatıldı: {url}")
            }),
            Notice::Restarting => NoticeText::info(if english {
                "Session not found, retrying...".to_string()
            } else {
                "Session bulunamadı, yeniden başlatılıyor...".to_string()
            }),
            Notice::Crawling { crawled, total } => {
                let count = match total {
                    Some(total) => format!("{crawled} / {total}"),
                    None => crawled.to_string(),
                };
                NoticeText::info(if english {
                    format!("Generating sitemap: {count} URLs")
                } else {
                    format!("Sitemap oluşturuluyor: {count} URL")
                })
            }
            Notice::Completed { crawled } => NoticeText::info(if english {
                format!("Done! {crawled} URLs found")
            } else {
                format!("Tamamlandı! {crawled} URL bulundu")
            }),
            Notice::NoUrlsFound => NoticeText::warning(if english {
                "Warning: no URLs found to crawl".to_string()
            } else {
                "Uyarı: Taranacak URL bulunamadı".to_string()
            }),
            Notice::SessionError { error, details } => {
                let mut text = NoticeText::error(if english {
                    format!("Error: {error}")
                } else {
                    format!("Hata: {error}")
                });
                text.detail = details.as_ref().map(|details| {
                    let heading = if english { "Details:" } else { "Detay:" };
                    format!("{heading}\n{details}")
                });
                text
            }
            Notice::RequestFailed { reason } => {
                let reason = match reason {
                    Some(reason) => reason.as_str(),
                    None if english => "Failed to start crawling",
                    None => "Tarama başlatılamadı",
                };
                NoticeText::error(if english {
                    format!("Error: {reason}")
                } else {
                    format!("Hata: {reason}")
                })
            }
            Notice::PollFailed => NoticeText::error(if english {
                "An error occurred while updating progress.".to_string()
            } else {
                "İlerleme güncellenirken bir hata oluştu.".to_string()
            }),
            Notice::NoActiveSession => NoticeText::warning(if english {
                "No active session".to_string()
            } else {
                "Aktif oturum yok".to_string()
            }),
        }
    }

    pub fn download_status(self, status: &DownloadStatus) -> NoticeText {
        let english = self == Locale::English;
        match status {
            DownloadStatus::InProgress(kind) => NoticeText::info(if english {
                format!("Downloading {}...", kind_name(*kind))
            } else {
                format!("{} indiriliyor...", kind_name(*kind))
            }),
            DownloadStatus::Saved { kind, path } => NoticeText::info(if english {
                format!("Saved {} to {path}", kind_name(*kind))
            } else {
                format!("{} kaydedildi: {path}", kind_name(*kind))
            }),
            DownloadStatus::Failed { kind, reason } => NoticeText::error(if english {
                format!("Download of {} failed: {reason}", kind_name(*kind))
            } else {
                format!("{} indirilemedi: {reason}", kind_name(*kind))
            }),
        }
    }
}

fn kind_name(kind: DownloadKind) -> &'static str {
    match kind {
        DownloadKind::Sitemap => "sitemap",
        DownloadKind::Csv => "CSV",
    }
}
