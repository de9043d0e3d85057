//! Plain-text preview projection for memo lists.
//!
//! # Responsibility
//! - Turn raw markdown into a short single-line summary.
//!
//! # Invariants
//! - Output never contains markdown symbols or line breaks.
//! - Output keeps at most `PREVIEW_MAX_CHARS` characters.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum characters kept in a preview.
pub const PREVIEW_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!|]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Derives a plain-text summary from markdown content.
///
/// Rules:
/// - images are dropped, links keep their label text;
/// - markdown symbols are removed and whitespace collapsed;
/// - the first `PREVIEW_MAX_CHARS` characters are kept.
///
/// Returns `None` when nothing readable remains.
pub fn derive_preview_text(content: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}
