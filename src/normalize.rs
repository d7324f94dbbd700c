//! Canonicalization and deduplication of ordered text lists.

use std::collections::HashSet;

/// Trim and collapse every internal whitespace run to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key used for deduplication.
pub fn dedup_key(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}

/// Normalize an ordered list of raw strings.
///
/// Each entry is trimmed and whitespace-collapsed. Entries whose lowercase
/// key is empty or was already seen are dropped; the first occurrence keeps
/// its original case and position.
pub fn normalize_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for item in items {
        let text = collapse_whitespace(item.as_ref());
        if text.is_empty() {
            continue;
        }
        if seen.insert(text.to_lowercase()) {
            out.push(text);
        }
    }

    out
}

/// Dedup-only pass for case-significant values such as URLs.
///
/// Entries are trimmed and compared by exact string.
pub fn dedup_exact<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for item in items {
        let text = item.as_ref().trim();
        if text.is_empty() {
            continue;
        }
        if seen.insert(text.to_string()) {
            out.push(text.to_string());
        }
    }

    out
}

/// Normalize a single optional value, mapping blank text to `None`.
pub fn normalize_text(text: &str) -> Option<String> {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
