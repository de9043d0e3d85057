//! Category + search evaluation.
//!
//! # Responsibility
//! - Parse raw search input into a [`SearchTerm`].
//! - Select and order the memos visible under a filter state.
//!
//! # Invariants
//! - Category and search stages compose by intersection.
//! - Matching is case-insensitive substring matching; no ranking.
//! - Output order is `created_at` descending, ties keep collection order.

use crate::model::memo::{CategoryFilter, Memo};

/// Prefix that restricts a search to tags only.
pub const TAG_MARKER: char = '#';

/// Parsed search input, with needles already lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Blank input; nothing is filtered.
    Any,
    /// Substring of title, content or any tag.
    Text(String),
    /// Substring of any tag (input started with `#`).
    Tag(String),
}

impl SearchTerm {
    /// Parses raw user input.
    ///
    /// Whitespace-only input is [`SearchTerm::Any`]. A leading `#` selects tag
    /// mode; the remainder is trimmed, and an empty remainder matches every
    /// memo that has at least one tag.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Any;
        }

        match trimmed.strip_prefix(TAG_MARKER) {
            Some(rest) => Self::Tag(fold_case(rest.trim())),
            None => Self::Text(fold_case(trimmed)),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Any)
    }

    /// Returns whether `memo` passes this search stage.
    pub fn matches(&self, memo: &Memo) -> bool {
        match self {
            Self::Any => true,
            Self::Tag(needle) => any_tag_contains(memo, needle),
            Self::Text(needle) => {
                contains_folded(&memo.title, needle)
                    || contains_folded(&memo.content, needle)
                    || any_tag_contains(memo, needle)
            }
        }
    }
}

/// Ordered visible subset returned by [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome<'a> {
    /// Matching memos in display order.
    pub items: Vec<&'a Memo>,
    pub match_count: usize,
}

/// Evaluates a filter state against a memo collection.
pub fn evaluate<'a>(
    memos: &'a [Memo],
    category: &CategoryFilter,
    search: &str,
) -> QueryOutcome<'a> {
    let term = SearchTerm::parse(search);
    let mut items: Vec<&Memo> = memos
        .iter()
        .filter(|memo| category.matches(memo.category))
        .filter(|memo| term.matches(memo))
        .collect();
    // Stable sort: equal timestamps keep collection order.
    items.sort_by(|left, right| right.created_at.cmp(&left.created_at));

    QueryOutcome {
        match_count: items.len(),
        items,
    }
}

fn any_tag_contains(memo: &Memo, needle: &str) -> bool {
    memo.tags.iter().any(|tag| contains_folded(tag, needle))
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(needle)
}

/// Lowercases per character so folding never depends on neighbouring text.
/// Final sigma folds to `σ`.
fn fold_case(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|ch| if ch == 'ς' { 'σ' } else { ch })
        .collect()
}
