//! Persistence boundary for memos.
//!
//! # Responsibility
//! - Define the `PersistencePort` contract consumed by the memo service.
//! - Provide SQLite and in-memory implementations of that contract.
//!
//! # Invariants
//! - Implementations report failures as `PersistenceFailure` values.
//! - A failed call leaves durable state unchanged.

pub mod memo_repo;
pub mod memory_repo;
pub mod port;
