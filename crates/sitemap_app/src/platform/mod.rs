mod app;
pub mod config;
mod effects;
pub mod ui;

pub use app::run_app;
