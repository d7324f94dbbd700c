use std::sync::LazyLock;

use log::debug;
use scraper::{ElementRef, Html, Selector};

use super::{
    all_elements, container_items, descendant_elements, element_text, has_marker, is_heading,
    is_noise, list_items, Candidate, ListStrategy, Strategy, HEADINGS, STEP_CLASS_TOKENS,
    STEP_HEADING_TOKENS,
};

static ORDERED_LISTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ol").expect("valid ol selector"));

/// DOM fallbacks for steps, after structured data. Ordered by priority.
pub const CHAIN: &[Strategy<ListStrategy>] = &[
    Strategy {
        name: "step_headings",
        run: from_headings,
    },
    Strategy {
        name: "step_containers",
        run: from_containers,
    },
    Strategy {
        name: "first_ordered_list",
        run: from_first_ordered_list,
    },
];

fn is_step_heading(heading: ElementRef<'_>) -> bool {
    let text = element_text(heading).to_lowercase();
    STEP_HEADING_TOKENS.iter().any(|token| text.contains(token))
}

/// Collect `tags` text inside `element` until its first descendant heading.
/// Returns true when such a heading ended the walk.
fn items_until_heading<'a>(
    element: ElementRef<'a>,
    tags: &[&str],
    items: &mut Vec<Candidate<'a>>,
) -> bool {
    for el in descendant_elements(element) {
        if is_heading(el) {
            return true;
        }
        if tags.iter().any(|tag| *tag == el.value().name()) {
            items.extend(Candidate::from_element(el));
        }
    }
    false
}

/// Items of the section that follows `heading`, up to the next heading,
/// whether that heading is a sibling or nested inside one.
fn section_items(heading: ElementRef<'_>) -> Vec<Candidate<'_>> {
    let mut items = Vec::new();

    for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
        if is_heading(sibling) {
            break;
        }
        if is_noise(sibling) {
            continue;
        }
        let reached_heading = match sibling.value().name() {
            "p" | "li" => {
                items.extend(Candidate::from_element(sibling));
                false
            }
            "ol" | "ul" => items_until_heading(sibling, &["li"], &mut items),
            _ => items_until_heading(sibling, &["li", "p"], &mut items),
        };
        if reached_heading {
            break;
        }
    }

    items
}

/// Items under the first instruction-like heading that has any.
pub fn from_headings(document: &Html) -> Vec<Candidate<'_>> {
    for heading in document.select(&HEADINGS).filter(|h| is_step_heading(*h)) {
        let items = section_items(heading);
        if !items.is_empty() {
            debug!(
                "Steps found under heading {:?} ({} items)",
                element_text(heading),
                items.len()
            );
            return items;
        }
    }
    Vec::new()
}

/// `li`/`p` text from instruction-marked containers that are not noise.
pub fn from_containers(document: &Html) -> Vec<Candidate<'_>> {
    all_elements(document)
        .filter(|el| has_marker(*el, STEP_CLASS_TOKENS) && !is_noise(*el))
        .flat_map(container_items)
        .collect()
}

/// `li` text of the first `ol` outside a noise section that has any items.
pub fn from_first_ordered_list(document: &Html) -> Vec<Candidate<'_>> {
    for list in document.select(&ORDERED_LISTS) {
        let noisy_parent = list
            .parent()
            .and_then(ElementRef::wrap)
            .map_or(false, is_noise);
        if noisy_parent || is_noise(list) {
            continue;
        }
        let items = list_items(list);
        if !items.is_empty() {
            return items;
        }
    }
    Vec::new()
}
