//! Persistence port consumed by the memo service.
//!
//! # Responsibility
//! - Define the request/response contract with the durable memo store.
//! - Carry failures as values; implementations never panic across it.
//!
//! # Invariants
//! - `create` assigns `id`, `created_at` and `updated_at`.
//! - A returned `Ok` means the write is durable and may be mirrored locally.

use crate::model::memo::{Memo, MemoDraft, MemoId, MemoPatch};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PortResult<T> = Result<T, PersistenceFailure>;

/// Port operation names, used for failure reporting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortOperation {
    FetchAll,
    Create,
    Update,
    Delete,
    ClearAll,
}

impl PortOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchAll => "fetch_all",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ClearAll => "clear_all",
        }
    }
}

impl Display for PortOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a persistence implementation.
///
/// Carries no retry metadata; retrying is the caller's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceFailure {
    pub operation: PortOperation,
    pub message: String,
}

impl PersistenceFailure {
    pub fn new(operation: PortOperation, message: impl Display) -> Self {
        Self {
            operation,
            message: message.to_string(),
        }
    }
}

impl Display for PersistenceFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "persistence {} failed: {}", self.operation, self.message)
    }
}

impl Error for PersistenceFailure {}

/// Durable memo storage boundary.
pub trait PersistencePort {
    /// Returns every stored memo.
    fn fetch_all(&self) -> PortResult<Vec<Memo>>;
    /// Stores a new memo and returns it with id and timestamps assigned.
    fn create(&mut self, draft: &MemoDraft) -> PortResult<Memo>;
    /// Applies a partial update and returns the stored result.
    fn update(&mut self, id: MemoId, patch: &MemoPatch) -> PortResult<Memo>;
    fn delete(&mut self, id: MemoId) -> PortResult<()>;
    /// Removes every stored memo.
    fn clear_all(&mut self) -> PortResult<()>;
}
