//! Pure query functions over a memo collection.
//!
//! # Responsibility
//! - Compute the visible subset for a category filter + search string.
//! - Compute per-category totals over the unfiltered collection.
//!
//! # Invariants
//! - Both functions are pure: output depends only on their arguments.

pub mod aggregate;
pub mod filter;
