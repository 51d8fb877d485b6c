//! Slug and tag derivation
//!
//! Computed-field helpers shared by the content forms: slugs derived from
//! titles, and the comma-separated round-trip for tag and tech-stack
//! inputs.

use regex::Regex;
use std::sync::OnceLock;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9_-]+").expect("valid regex"))
}

fn repeated_hyphen_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-{2,}").expect("valid regex"))
}

/// Derive a URL-safe slug from a title.
///
/// Lowercases, turns whitespace runs into hyphens, strips everything that
/// is not `[a-z0-9_-]`, collapses repeated hyphens and trims hyphens from
/// both ends. Applying it to its own output changes nothing, so a slug a
/// user typed by hand survives a re-derivation.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim();
    let hyphenated = whitespace_re().replace_all(trimmed, "-");
    let cleaned = non_word_re().replace_all(&hyphenated, "");
    let collapsed = repeated_hyphen_re().replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

/// Split a comma-separated input field into a tag list.
///
/// Entries are trimmed and empty ones dropped. A tag that itself contains
/// a comma cannot survive the round-trip; the admin form accepts that.
pub fn split_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a tag list back into the form's display string
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
