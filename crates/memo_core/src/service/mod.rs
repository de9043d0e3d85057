//! Memo use-case services.
//!
//! # Responsibility
//! - Orchestrate persistence calls, store mutations and view recomputation.
//! - Keep UI/CLI layers decoupled from storage details.
//!
//! # Invariants
//! - The store is mutated only after the persistence port acknowledges.

pub mod filter_state;
pub mod memo_service;
