//! Core domain logic for the brain-dump productivity app.
//! This crate is the single source of truth for item, profile and capture
//! invariants; the FFI and CLI crates are thin shells over it.

pub mod ai;
pub mod app;
pub mod config;
pub mod db;
pub mod library;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use ai::categorizer::{Categorization, Categorizer};
pub use ai::gemini::GeminiClient;
pub use ai::nudge::{NudgeBoard, NudgeClient};
pub use ai::{AiError, AiResult, GenerateRequest, TextModel};
pub use app::AppContext;
pub use config::{ConfigError, Settings};
pub use library::filter::{
    apply_library_query, apply_library_query_in, DateRange, InvalidQuery, LibraryQuery,
    QueryInput, SortOption, StatusFilter,
};
pub use library::views::{tasks_view, wins_view, TasksView, WinsView};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{Item, ItemId, ItemPatch, ItemType, Priority};
pub use model::profile::{
    NudgeFrequency, Palette, Preferences, PreferencesPatch, ProfilePatch, UserProfile,
};
pub use model::view::View;
pub use repo::kv_repo::{KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use service::capture::{
    AnalysisOutcome, AnalysisTicket, CaptureError, CaptureState, CaptureWorkflow,
    SUCCESS_ADVANCE_DELAY,
};
pub use store::{StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
