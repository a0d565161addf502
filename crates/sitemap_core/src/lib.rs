//! Sitemap core: pure crawl-session state machine and view-model helpers.
mod effect;
mod msg;
mod progress;
mod state;
mod update;
mod view_model;

pub use effect::{DownloadTarget, Effect};
pub use msg::{DownloadKind, Msg};
pub use progress::{classify_progress, PollOutcome, ProgressSnapshot, SESSION_EXPIRED_SENTINEL};
pub use state::{AppState, Generation, Phase, PollTiming, SessionId};
pub use update::update;
pub use view_model::{AppViewModel, DownloadStatus, Notice};
