//! In-memory memo collection.
//!
//! # Responsibility
//! - Hold the confirmed memo collection for one session.
//! - Report missing or duplicate ids as semantic errors.
//!
//! # Invariants
//! - The store performs no I/O; callers mutate it only after persistence
//!   acknowledgement.

pub mod memo_store;
