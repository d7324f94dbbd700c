use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{Candidate, Strategy, TextStrategy};

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid h1 selector"));
static HEAD_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("head > title").expect("valid head title selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

/// DOM fallbacks for the title, after structured data.
pub const CHAIN: &[Strategy<TextStrategy>] = &[
    Strategy {
        name: "first_h1",
        run: first_h1,
    },
    Strategy {
        name: "document_title",
        run: document_title,
    },
];

/// Text of the first `h1` in the document.
pub fn first_h1(document: &Html) -> Option<Candidate<'_>> {
    document
        .select(&H1)
        .next()
        .and_then(Candidate::from_element)
}

fn inside_svg(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|el| el.value().name() == "svg")
}

/// Text of the document's `title` element. The one in `head` wins; a stray
/// `title` elsewhere is accepted unless it labels an inline SVG.
pub fn document_title(document: &Html) -> Option<Candidate<'_>> {
    document
        .select(&HEAD_TITLE)
        .next()
        .or_else(|| document.select(&TITLE).find(|title| !inside_svg(*title)))
        .and_then(Candidate::from_element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h1_preferred_over_title() {
        let document = Html::parse_document(
            "<html><head><title>Site | Tacos</title></head><body><h1> Street  Tacos </h1><h1>Other</h1></body></html>",
        );
        assert_eq!(first_h1(&document).unwrap().text, "Street  Tacos");
        assert_eq!(document_title(&document).unwrap().text, "Site | Tacos");
    }

    #[test]
    fn test_svg_titles_are_not_document_titles() {
        let icon_only = Html::parse_document(
            "<html><head></head><body><svg><title>Search icon</title></svg></body></html>",
        );
        assert!(document_title(&icon_only).is_none());

        let with_head = Html::parse_document(
            "<html><head><title>Fish Pie</title></head><body><svg><title>Menu</title></svg></body></html>",
        );
        assert_eq!(document_title(&with_head).unwrap().text, "Fish Pie");

        let stray = Html::parse_document(
            "<html><head></head><body><svg><title>Logo</title></svg><title>Late Title</title></body></html>",
        );
        assert_eq!(document_title(&stray).unwrap().text, "Late Title");
    }

    #[test]
    fn test_empty_h1_yields_nothing() {
        let document =
            Html::parse_document("<html><head><title>Soup</title></head><body><h1> </h1></body></html>");
        assert!(first_h1(&document).is_none());
        assert_eq!(document_title(&document).unwrap().text, "Soup");
    }
}
