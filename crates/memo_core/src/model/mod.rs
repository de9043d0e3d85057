//! Memo domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by store, query and service.
//! - Keep plain-text projections (preview) next to the record they derive from.
//!
//! # Invariants
//! - Every memo is identified by a stable `MemoId`.
//! - Categories form a closed set; the "all" bucket exists only as a filter.

pub mod memo;
pub mod preview;
