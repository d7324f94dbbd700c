use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::Candidate;

static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Absolute `http`/`https` anchor targets in document order.
pub fn collect(document: &Html) -> Vec<Candidate<'_>> {
    document
        .select(&ANCHORS)
        .filter_map(|anchor| Candidate::from_attr(anchor, "href"))
        .filter(|candidate| candidate.text.starts_with("http"))
        .collect()
}
