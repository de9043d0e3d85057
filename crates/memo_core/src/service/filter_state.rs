//! Filter state and the view derived from it.
//!
//! # Responsibility
//! - Hold the active `{category, search}` pair as one explicit value.
//! - Derive `{visible, visible_count, total_count, category_counts}` from a
//!   collection snapshot.
//!
//! # Invariants
//! - A view is always derived from scratch; nothing is tracked incrementally.
//! - `category_counts` ignores `search`; `visible_count` honours both.

use crate::model::memo::{CategoryFilter, Memo};
use crate::query::aggregate::{aggregate, CategoryCounts};
use crate::query::filter::{evaluate, SearchTerm};
use serde::Serialize;

/// Active category selection and search text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub category: CategoryFilter,
    /// Raw search input, kept as typed.
    pub search: String,
}

impl FilterState {
    /// Canonical "reset filters" value: all categories, empty search.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns whether any filter narrows the visible list.
    pub fn is_active(&self) -> bool {
        self.category != CategoryFilter::All || self.search_term().is_active()
    }

    pub fn search_term(&self) -> SearchTerm {
        SearchTerm::parse(&self.search)
    }
}

/// Read-only view exposed to the UI boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoView {
    /// Memos passing both filters, newest first.
    pub visible: Vec<Memo>,
    pub visible_count: usize,
    /// Size of the whole collection.
    pub total_count: usize,
    pub category_counts: CategoryCounts,
}

impl MemoView {
    pub fn derive(memos: &[Memo], filter: &FilterState) -> Self {
        let outcome = evaluate(memos, &filter.category, &filter.search);
        Self {
            visible: outcome.items.into_iter().cloned().collect(),
            visible_count: outcome.match_count,
            total_count: memos.len(),
            category_counts: aggregate(memos),
        }
    }
}
