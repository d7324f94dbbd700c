use log::debug;
use scraper::Html;

use crate::extractors::{
    image, ingredients, json_ld, links, steps, title, ListStrategy, Strategy, TextStrategy,
};
use crate::model::ExtractionResult;
use crate::normalize::{dedup_exact, normalize_list, normalize_text};

/// Run a list chain and return the first strategy's non-empty normalized output.
pub fn first_list(field: &str, chain: &[Strategy<ListStrategy>], document: &Html) -> Vec<String> {
    for strategy in chain {
        let candidates = (strategy.run)(document);
        let origin = candidates
            .first()
            .map(|c| c.node.value().name().to_string())
            .unwrap_or_default();
        let items = normalize_list(candidates.into_iter().map(|c| c.text));
        if !items.is_empty() {
            debug!(
                "{field}: strategy {} matched {} items, first from <{origin}>",
                strategy.name,
                items.len()
            );
            return items;
        }
    }
    debug!("{field}: no strategy matched");
    Vec::new()
}

/// Run a single-value chain and return the first strategy's non-blank output.
pub fn first_text(
    field: &str,
    chain: &[Strategy<TextStrategy>],
    document: &Html,
    normalize: fn(&str) -> Option<String>,
) -> Option<String> {
    let found = chain.iter().find_map(|strategy| {
        let candidate = (strategy.run)(document)?;
        let value = normalize(&candidate.text)?;
        debug!(
            "{field}: strategy {} matched <{}>",
            strategy.name,
            candidate.node.value().name()
        );
        Some(value)
    });
    if found.is_none() {
        debug!("{field}: no strategy matched");
    }
    found
}

fn trimmed(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Extract a recipe record from a parsed page.
///
/// Structured data is consulted first; each field it leaves empty falls back
/// to that field's heuristic chain. A structured-data value is never merged
/// with heuristic output.
pub fn extract(document: &Html) -> ExtractionResult {
    let structured = json_ld::parse(document);

    let title = structured
        .title
        .as_deref()
        .and_then(normalize_text)
        .or_else(|| first_text("title", title::CHAIN, document, normalize_text));

    let ingredients = Some(normalize_list(&structured.ingredients))
        .filter(|items| !items.is_empty())
        .unwrap_or_else(|| first_list("ingredients", ingredients::CHAIN, document));

    let steps = Some(normalize_list(&structured.steps))
        .filter(|items| !items.is_empty())
        .unwrap_or_else(|| first_list("steps", steps::CHAIN, document));

    let image = structured
        .image
        .as_deref()
        .and_then(trimmed)
        .or_else(|| first_text("image", image::CHAIN, document, trimmed));

    let links = dedup_exact(links::collect(document).into_iter().map(|c| c.text));

    ExtractionResult {
        title,
        ingredients,
        steps,
        image,
        links,
    }
}

/// Parse raw HTML and extract from it.
pub fn extract_html(html: &str) -> ExtractionResult {
    let document = Html::parse_document(html);
    extract(&document)
}
