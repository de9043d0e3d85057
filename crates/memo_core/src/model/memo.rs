//! Memo domain model.
//!
//! # Responsibility
//! - Define the canonical memo record and its create/update inputs.
//! - Own tag normalization so every write path shares one rule.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - Every memo belongs to exactly one `Category`; "all" is filter-only.
//! - `tags` holds no blank entries and no duplicates (case-sensitive), in
//!   first-seen order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable memo identifier assigned by the persistence collaborator.
pub type MemoId = Uuid;

/// Closed set of stored memo categories.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Study,
    Idea,
    Other,
}

impl Category {
    pub const COUNT: usize = 5;

    /// Every category in display order.
    pub const ALL: [Category; Self::COUNT] = [
        Category::Personal,
        Category::Work,
        Category::Study,
        Category::Idea,
        Category::Other,
    ];

    /// Stable storage/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Work => "work",
            Self::Study => "study",
            Self::Idea => "idea",
            Self::Other => "other",
        }
    }

    /// Human-facing label shown by the category selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Personal => "개인",
            Self::Work => "업무",
            Self::Study => "학습",
            Self::Idea => "아이디어",
            Self::Other => "기타",
        }
    }

    /// Position inside [`Category::ALL`].
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Personal => 0,
            Self::Work => 1,
            Self::Study => 2,
            Self::Idea => 3,
            Self::Other => 4,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownCategory(value.to_string()))
    }
}

/// Category selector value, including the virtual "all" bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    /// No category restriction.
    #[default]
    All,
    /// Only memos stored under this category.
    Only(Category),
}

impl CategoryFilter {
    /// Returns whether `category` passes this filter.
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => *expected == category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "전체",
            Self::Only(category) => category.label(),
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(value: Category) -> Self {
        Self::Only(value)
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => Display::fmt(category, f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse::<Category>().map(Self::Only)
    }
}

/// Canonical memo record, as acknowledged by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: MemoId,
    pub title: String,
    /// Raw markdown source.
    pub content: String,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds; never earlier than `created_at`.
    pub updated_at: i64,
}

impl Memo {
    /// Re-applies tag normalization in place.
    pub fn normalize(&mut self) {
        self.tags = normalize_tags(&self.tags);
    }

    /// Applies the provided fields of `patch` and refreshes `updated_at`.
    ///
    /// `updated_at` never moves backwards.
    pub fn apply_patch(&mut self, patch: &MemoPatch, updated_at: i64) {
        if let Some(title) = patch.title.as_ref() {
            self.title = title.clone();
        }
        if let Some(content) = patch.content.as_ref() {
            self.content = content.clone();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags.as_ref() {
            self.tags = normalize_tags(tags);
        }
        self.updated_at = self.updated_at.max(updated_at);
    }
}

/// Create input: a memo without id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoDraft {
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
}

impl MemoDraft {
    /// Builds a draft with no tags.
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
            tags: Vec::new(),
        }
    }

    /// Replaces the tag list, normalizing it.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw: Vec<String> = tags.into_iter().map(Into::into).collect();
        self.tags = normalize_tags(&raw);
        self
    }

    /// Appends one tag; blanks and duplicates are ignored.
    pub fn add_tag(&mut self, tag: &str) {
        push_tag(&mut self.tags, tag);
    }

    /// Checks the upstream form contract (non-blank title and content).
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }

    /// Materializes the draft into a memo once an id and timestamp exist.
    pub fn into_memo(self, id: MemoId, now: i64) -> Memo {
        Memo {
            id,
            title: self.title,
            content: self.content,
            category: self.category,
            tags: normalize_tags(&self.tags),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update input; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
}

impl MemoPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw: Vec<String> = tags.into_iter().map(Into::into).collect();
        self.tags = Some(normalize_tags(&raw));
        self
    }

    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.tags.is_none()
    }

    /// Checks the upstream form contract for the fields that are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = self.title.as_deref() {
            require_text("title", title)?;
        }
        if let Some(content) = self.content.as_deref() {
            require_text("content", content)?;
        }
        Ok(())
    }
}

/// Input contract violations reported to upstream callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace-only.
    BlankField(&'static str),
    /// Category name outside the fixed enumeration.
    UnknownCategory(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::UnknownCategory(value) => write!(
                f,
                "unknown category `{value}`; expected all|personal|work|study|idea|other"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Normalizes a tag list: trims entries, drops blanks and later duplicates.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(tags.len());
    for tag in tags {
        push_tag(&mut normalized, tag);
    }
    normalized
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn push_tag(tags: &mut Vec<String>, tag: &str) {
    let trimmed = tag.trim();
    if trimmed.is_empty() || tags.iter().any(|existing| existing == trimmed) {
        return;
    }
    tags.push(trimmed.to_string());
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
