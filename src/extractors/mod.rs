//! Field extractors: the structured-data parser and one heuristic chain per
//! field. Every DOM strategy degrades to an empty result on unexpected markup.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

pub mod image;
pub mod ingredients;
pub mod json_ld;
pub mod links;
pub mod steps;
pub mod title;

/// Class/id substrings marking an ingredient container.
pub const INGREDIENT_TOKENS: &[&str] = &["ingredient"];

/// Class/id substrings marking an instruction container.
pub const STEP_CLASS_TOKENS: &[&str] = &["instruction", "direction", "step"];

/// Heading text substrings introducing an instruction section.
pub const STEP_HEADING_TOKENS: &[&str] = &[
    "instruction",
    "direction",
    "step",
    "method",
    "preparation",
    "process",
];

/// Class/id substrings marking unrelated user content.
pub const NOISE_TOKENS: &[&str] = &["comment", "review"];

/// `alt` substrings that disqualify an `img` from being the hero image.
pub const IMAGE_ALT_EXCLUDE_TOKENS: &[&str] = &["logo", "icon", "avatar"];

pub(crate) static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").expect("valid heading selector"));

/// A raw text fragment found by a strategy, before normalization.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub text: String,
    pub node: ElementRef<'a>,
}

impl<'a> Candidate<'a> {
    /// Candidate holding the element's own text, `None` when it is blank.
    pub fn from_element(node: ElementRef<'a>) -> Option<Self> {
        let text = element_text(node);
        if text.is_empty() {
            None
        } else {
            Some(Candidate { text, node })
        }
    }

    /// Candidate holding an attribute value, `None` when missing or blank.
    pub fn from_attr(node: ElementRef<'a>, attr: &str) -> Option<Self> {
        let value = node.value().attr(attr)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(Candidate {
                text: value.to_string(),
                node,
            })
        }
    }
}

/// Strategy producing an ordered list of candidates.
pub type ListStrategy = for<'a> fn(&'a Html) -> Vec<Candidate<'a>>;

/// Strategy producing at most one candidate.
pub type TextStrategy = for<'a> fn(&'a Html) -> Option<Candidate<'a>>;

/// A named entry of a strategy chain.
#[derive(Clone, Copy)]
pub struct Strategy<F> {
    pub name: &'static str,
    pub run: F,
}

/// Text of an element with a single space between its text nodes, so that
/// adjacent inline children ("2" and "cups") do not glue together.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every element of the document, in document order.
pub fn all_elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

/// Element descendants of `element`, excluding the element itself.
pub fn descendant_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Lowercased `class` and `id` attributes joined by a space.
fn class_and_id(element: ElementRef<'_>) -> String {
    let el = element.value();
    format!(
        "{} {}",
        el.attr("class").unwrap_or_default(),
        el.attr("id").unwrap_or_default()
    )
    .to_lowercase()
}

/// True when the element's class list or id contains any of `tokens`.
pub fn has_marker(element: ElementRef<'_>, tokens: &[&str]) -> bool {
    let attrs = class_and_id(element);
    tokens.iter().any(|token| attrs.contains(token))
}

/// True when the element's class list or id contains a noise token.
pub fn is_noise(element: ElementRef<'_>) -> bool {
    has_marker(element, NOISE_TOKENS)
}

pub fn is_heading(element: ElementRef<'_>) -> bool {
    matches!(
        element.value().name(),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    )
}

/// `li` text of a list element.
pub fn list_items(list: ElementRef<'_>) -> Vec<Candidate<'_>> {
    descendant_elements(list)
        .filter(|el| el.value().name() == "li")
        .filter_map(Candidate::from_element)
        .collect()
}

/// `li`/`p` text inside a container. A container that is itself an `li` or
/// `p` contributes its own text.
pub fn container_items(container: ElementRef<'_>) -> Vec<Candidate<'_>> {
    if matches!(container.value().name(), "li" | "p") {
        return Candidate::from_element(container).into_iter().collect();
    }

    descendant_elements(container)
        .filter(|el| matches!(el.value().name(), "li" | "p"))
        .filter_map(Candidate::from_element)
        .collect()
}
