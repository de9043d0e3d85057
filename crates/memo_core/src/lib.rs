//! Core domain logic for the memo board.
//! This crate is the single source of truth for memo filtering, counting and
//! the mutate-after-acknowledgement discipline.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::memo::{
    normalize_tags, now_epoch_ms, Category, CategoryFilter, Memo, MemoDraft, MemoId, MemoPatch,
    ValidationError,
};
pub use model::preview::derive_preview_text;
pub use query::aggregate::{aggregate, CategoryCounts};
pub use query::filter::{evaluate, QueryOutcome, SearchTerm};
pub use repo::memo_repo::{RepoError, SqliteMemoRepository};
pub use repo::memory_repo::InMemoryPersistence;
pub use repo::port::{PersistenceFailure, PersistencePort, PortOperation, PortResult};
pub use service::filter_state::{FilterState, MemoView};
pub use service::memo_service::{MemoError, MemoResult, MemoService};
pub use store::memo_store::{MemoStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
