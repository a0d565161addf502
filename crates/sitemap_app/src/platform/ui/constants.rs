use super::ControlId;

pub const CRAWL_FORM: ControlId = ControlId::new("crawlForm");
pub const INPUT_URL: ControlId = ControlId::new("urlInput");
pub const BUTTON_SUBMIT: ControlId = ControlId::new("submitBtn");
pub const LABEL_PROGRESS: ControlId = ControlId::new("progress");
pub const LIST_URLS: ControlId = ControlId::new("urlList");
pub const BUTTON_DOWNLOAD: ControlId = ControlId::new("downloadBtn");
pub const BUTTON_CSV: ControlId = ControlId::new("csvBtn");
pub const PANEL_RESULTS: ControlId = ControlId::new("resultsContainer");
pub const LABEL_STATUS: ControlId = ControlId::new("statusBar");
