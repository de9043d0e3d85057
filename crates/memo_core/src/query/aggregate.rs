//! Per-category totals.
//!
//! # Responsibility
//! - Count memos per fixed category over the whole collection.
//!
//! # Invariants
//! - Counts ignore any active search; only collection changes move them.
//! - `total()` always equals the sum of the per-category counts.

use crate::model::memo::{Category, CategoryFilter, Memo};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Category totals computed by [`aggregate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: [usize; Category::COUNT],
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    /// Count shown next to a selector entry; `All` is the grand total.
    pub fn get_filter(&self, filter: &CategoryFilter) -> usize {
        match filter {
            CategoryFilter::All => self.total(),
            CategoryFilter::Only(category) => self.get(*category),
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(category, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::COUNT + 1))?;
        map.serialize_entry("all", &self.total())?;
        for (category, count) in self.iter() {
            map.serialize_entry(category.as_str(), &count)?;
        }
        map.end()
    }
}

/// Counts memos per category, recomputed from scratch.
pub fn aggregate(memos: &[Memo]) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for memo in memos {
        counts.counts[memo.category.index()] += 1;
    }
    counts
}
