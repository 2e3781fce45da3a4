pub mod app;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod feedback;
pub mod input;
pub mod logger;
pub mod models;
pub mod runner;
pub mod session;
pub mod store;
pub mod timer;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod app_tests;

// Re-exports for convenience
pub use app::App;
pub use catalog::{Answer, Choice, Question, Response};
pub use config::AppConfig;
pub use error::{FeedbackError, StoreError};
pub use feedback::{Feedback, Tone};
pub use models::{AppEvent, ModuleKind, ProgressCounters, Route, Settings, UserProfile};
pub use runner::{Evaluation, ModuleRunner, Phase};
pub use session::SessionState;
pub use store::{MemoryStorage, SqliteStorage, Storage};
