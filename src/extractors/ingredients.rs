use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{
    all_elements, container_items, descendant_elements, has_marker, is_noise, list_items,
    Candidate, ListStrategy, Strategy, INGREDIENT_TOKENS,
};

static LISTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul, ol").expect("valid list selector"));

/// DOM fallbacks for ingredients, after structured data.
pub const CHAIN: &[Strategy<ListStrategy>] = &[
    Strategy {
        name: "ingredient_containers",
        run: from_containers,
    },
    Strategy {
        name: "ingredient_lists",
        run: from_lists,
    },
];

fn is_ingredient_container(element: ElementRef<'_>) -> bool {
    has_marker(element, INGREDIENT_TOKENS) && !is_noise(element)
}

/// True when the element is an `li`/`p` or holds one.
fn can_hold_items(element: ElementRef<'_>) -> bool {
    let is_item = |el: ElementRef<'_>| matches!(el.value().name(), "li" | "p");
    is_item(element) || descendant_elements(element).any(is_item)
}

/// Innermost ingredient-marked containers that are not noise, in document
/// order. A wrapper that holds another ingredient container is skipped so
/// its items are not collected twice. Marked elements with no `li`/`p` in
/// reach, such as amount or name spans, are not containers.
pub fn innermost_containers(document: &Html) -> Vec<ElementRef<'_>> {
    let marked: Vec<_> = all_elements(document)
        .filter(|el| is_ingredient_container(*el) && can_hold_items(*el))
        .collect();

    let wrappers: HashSet<_> = marked
        .iter()
        .flat_map(|el| el.ancestors().map(|node| node.id()))
        .collect();

    marked
        .into_iter()
        .filter(|el| !wrappers.contains(&el.id()))
        .collect()
}

/// `li`/`p` text from every innermost ingredient container.
pub fn from_containers(document: &Html) -> Vec<Candidate<'_>> {
    innermost_containers(document)
        .into_iter()
        .flat_map(container_items)
        .collect()
}

/// `li` text from `ul`/`ol` lists whose class names an ingredient list.
pub fn from_lists(document: &Html) -> Vec<Candidate<'_>> {
    document
        .select(&LISTS)
        .filter(|list| {
            let class = list.value().attr("class").unwrap_or_default().to_lowercase();
            INGREDIENT_TOKENS.iter().any(|token| class.contains(token)) && !is_noise(*list)
        })
        .flat_map(list_items)
        .collect()
}
