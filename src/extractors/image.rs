use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{Candidate, Strategy, TextStrategy, IMAGE_ALT_EXCLUDE_TOKENS};

static META: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("valid meta selector"));
static IMAGES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid img selector"));

/// DOM fallbacks for the hero image, after structured data.
pub const CHAIN: &[Strategy<TextStrategy>] = &[
    Strategy {
        name: "og_image",
        run: og_image,
    },
    Strategy {
        name: "first_content_image",
        run: first_content_image,
    },
];

/// `content` of the `og:image` meta tag, declared by `property` or `name`.
pub fn og_image(document: &Html) -> Option<Candidate<'_>> {
    document
        .select(&META)
        .filter(|meta| {
            let el = meta.value();
            [el.attr("property"), el.attr("name")]
                .into_iter()
                .flatten()
                .any(|key| key.trim().eq_ignore_ascii_case("og:image"))
        })
        .find_map(|meta| Candidate::from_attr(meta, "content"))
}

/// First `img` with a real `src` whose alt text is not a logo, icon or avatar.
pub fn first_content_image(document: &Html) -> Option<Candidate<'_>> {
    document
        .select(&IMAGES)
        .filter(|img| {
            let alt = img.value().attr("alt").unwrap_or_default().to_lowercase();
            !IMAGE_ALT_EXCLUDE_TOKENS
                .iter()
                .any(|token| alt.contains(token))
        })
        .filter_map(|img| Candidate::from_attr(img, "src"))
        .find(|candidate| {
            !candidate
                .text
                .get(..5)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
        })
}
