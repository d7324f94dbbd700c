//! Recipe metadata embedded as JSON-LD `<script>` blocks.
//!
//! Every field of a Recipe entry is decoded on its own: a field whose shape
//! does not match any known variant is treated as absent, and a block that
//! is not valid JSON is skipped. Neither stops the scan.

use std::sync::LazyLock;

use html_escape::decode_html_entities;
use log::debug;
use scraper::{Html, Selector};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::Value;

static SCRIPTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[type]").expect("valid script selector"));

/// Fields recovered from structured data. Empty when the page has none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredData {
    pub title: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image: Option<String>,
}

impl StructuredData {
    /// Fill fields that are still unset. Set fields are never overwritten.
    fn absorb(&mut self, entity: StructuredEntity) {
        if self.title.is_none() {
            self.title = entity
                .name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty());
        }
        if self.ingredients.is_empty() {
            self.ingredients = entity.ingredient_lines;
        }
        if self.steps.is_empty() {
            self.steps = entity.instructions.map(Instructions::into_steps).unwrap_or_default();
        }
        if self.image.is_none() {
            self.image = entity.image.and_then(ImageField::into_url);
        }
    }

    fn has_content(&self) -> bool {
        !self.ingredients.is_empty() || !self.steps.is_empty()
    }
}

/// Typed view of one JSON-LD Recipe entry.
#[derive(Debug, Default)]
pub struct StructuredEntity {
    pub name: Option<String>,
    /// Trimmed, non-empty ingredient lines.
    pub ingredient_lines: Vec<String>,
    pub instructions: Option<Instructions>,
    pub image: Option<ImageField>,
}

impl StructuredEntity {
    pub fn from_value(entry: &Value) -> Self {
        StructuredEntity {
            name: decode::<String>(entry, "name").map(|name| decode_html_symbols(&name)),
            ingredient_lines: decode::<IngredientField>(entry, "recipeIngredient")
                .map(IngredientField::into_lines)
                .unwrap_or_default(),
            instructions: decode::<InstructionsField>(entry, "recipeInstructions")
                .map(Instructions::from),
            image: decode::<ImageField>(entry, "image"),
        }
    }
}

/// Decode `entry[key]` into `T`, or `None` when missing or of another shape.
fn decode<T: DeserializeOwned>(entry: &Value, key: &str) -> Option<T> {
    let value = entry.get(key)?;
    match T::deserialize(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            debug!("JSON-LD field {key:?} has an unsupported shape: {e}");
            None
        }
    }
}

fn decode_html_symbols(text: &str) -> String {
    decode_html_entities(text).into_owned()
}

/// Recipe instructions after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instructions {
    /// One entry per step, in declaration order.
    Steps(Vec<String>),
    /// A single block of text with one step per line.
    FreeText(String),
}

impl Instructions {
    pub fn into_steps(self) -> Vec<String> {
        match self {
            Instructions::Steps(steps) => steps,
            Instructions::FreeText(text) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

impl From<InstructionsField> for Instructions {
    fn from(field: InstructionsField) -> Self {
        match field {
            InstructionsField::Text(text) => Instructions::FreeText(decode_html_symbols(&text)),
            InstructionsField::List(items) => {
                let mut steps = Vec::new();
                for item in items {
                    item.collect_texts(&mut steps);
                }
                Instructions::Steps(
                    steps
                        .iter()
                        .map(|step| decode_html_symbols(step.trim()))
                        .filter(|step| !step.is_empty())
                        .collect(),
                )
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InstructionsField {
    Text(String),
    List(Vec<InstructionItem>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InstructionItem {
    Text(String),
    Object(InstructionObject),
    Other(IgnoredAny),
}

/// `HowToStep` or `HowToSection`; both are plain objects in practice.
#[derive(Debug, Deserialize)]
pub struct InstructionObject {
    text: Option<String>,
    name: Option<String>,
    #[serde(rename = "itemListElement", default)]
    item_list_element: Vec<InstructionItem>,
}

impl InstructionItem {
    fn collect_texts(self, out: &mut Vec<String>) {
        match self {
            InstructionItem::Text(text) => out.push(text),
            InstructionItem::Object(step) => {
                if let Some(text) = step.text {
                    out.push(text);
                } else if !step.item_list_element.is_empty() {
                    for item in step.item_list_element {
                        item.collect_texts(out);
                    }
                } else if let Some(name) = step.name {
                    out.push(name);
                }
            }
            InstructionItem::Other(_) => {}
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IngredientField {
    Lines(Vec<IngredientLine>),
    Single(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IngredientLine {
    Text(String),
    Other(IgnoredAny),
}

impl IngredientField {
    fn into_lines(self) -> Vec<String> {
        let lines = match self {
            IngredientField::Lines(lines) => lines
                .into_iter()
                .filter_map(|line| match line {
                    IngredientLine::Text(text) => Some(text),
                    IngredientLine::Other(_) => None,
                })
                .collect(),
            IngredientField::Single(text) => vec![text],
        };

        lines
            .iter()
            .map(|line| decode_html_symbols(line.trim()))
            .filter(|line| !line.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ImageObject {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ImageField {
    Url(String),
    Object(ImageObject),
    List(Vec<ImageItem>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ImageItem {
    Url(String),
    Object(ImageObject),
    Other(IgnoredAny),
}

impl ImageItem {
    fn into_url(self) -> Option<String> {
        match self {
            ImageItem::Url(url) => Some(url),
            ImageItem::Object(obj) => Some(obj.url),
            ImageItem::Other(_) => None,
        }
    }
}

impl ImageField {
    /// The object's `url`, else the first usable list element, else the
    /// plain string.
    pub fn into_url(self) -> Option<String> {
        let url = match self {
            ImageField::Object(obj) => Some(obj.url),
            ImageField::List(items) => items
                .into_iter()
                .filter_map(ImageItem::into_url)
                .find(|url| !url.trim().is_empty()),
            ImageField::Url(url) => Some(url),
        }?;

        let url = decode_html_symbols(url.trim());
        if url.is_empty() {
            None
        } else {
            Some(url)
        }
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(type_str)) => type_str.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|type_str| type_str.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// Top-level entries of a block: the array's elements or the object itself,
/// each followed by the members of its `@graph`, if any.
fn flatten_entries(json: &Value) -> Vec<&Value> {
    let top: Vec<&Value> = match json {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut entries = Vec::new();
    for entry in top {
        entries.push(entry);
        if let Some(Value::Array(graph)) = entry.get("@graph") {
            entries.extend(graph.iter());
        }
    }
    entries
}

/// Strip `<!-- -->` or CDATA wrappers some CMSes leave around the JSON.
fn unwrap_markup(raw: &str) -> &str {
    let mut text = raw.trim();
    for (open, close) in [
        ("<!--", "-->"),
        ("//<![CDATA[", "//]]>"),
        ("<![CDATA[", "]]>"),
    ] {
        if let Some(inner) = text.strip_prefix(open).and_then(|t| t.strip_suffix(close)) {
            text = inner.trim();
        }
    }
    text
}

fn decode_block(raw: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(raw) {
        Ok(json) => Ok(json),
        Err(e) => {
            let unwrapped = unwrap_markup(raw);
            if unwrapped.len() == raw.trim().len() {
                return Err(e);
            }
            serde_json::from_str(unwrapped)
        }
    }
}

/// Scan every `ld+json` script block for the first Recipe entry of each
/// block, stopping once ingredients or steps have been found.
pub fn parse(document: &Html) -> StructuredData {
    let mut data = StructuredData::default();

    let scripts = document.select(&SCRIPTS).filter(|script| {
        script
            .value()
            .attr("type")
            .is_some_and(|t| t.to_ascii_lowercase().contains("ld+json"))
    });

    for (index, script) in scripts.enumerate() {
        let raw: String = script.text().collect();
        let json = match decode_block(&raw) {
            Ok(json) => json,
            Err(e) => {
                debug!("Skipping JSON-LD block {index}: {e}");
                continue;
            }
        };

        match flatten_entries(&json).into_iter().find(|entry| is_recipe_type(entry)) {
            Some(entry) => {
                debug!("Found Recipe entry in JSON-LD block {index}");
                data.absorb(StructuredEntity::from_value(entry));
            }
            None => debug!("No Recipe entry in JSON-LD block {index}"),
        }

        if data.has_content() {
            break;
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_html_document(blocks: &[&str]) -> String {
        let scripts: String = blocks
            .iter()
            .map(|json| format!(r#"<script type="application/ld+json">{json}</script>"#))
            .collect();
        format!("<!DOCTYPE html><html><head>{scripts}</head><body></body></html>")
    }

    fn parse_blocks(blocks: &[&str]) -> StructuredData {
        let document = Html::parse_document(&create_html_document(blocks));
        parse(&document)
    }

    #[test]
    fn test_parse_basic_recipe() {
        let data = parse_blocks(&[r#"
        {
            "@context": "https://schema.org/",
            "@type": "Recipe",
            "name": "Chocolate Chip Cookies",
            "image": "https://example.com/cookie.jpg",
            "recipeIngredient": ["flour", " sugar ", "", "chocolate chips"],
            "recipeInstructions": "Mix ingredients.\nBake at 350F for 10 minutes.\n"
        }
        "#]);

        assert_eq!(data.title.as_deref(), Some("Chocolate Chip Cookies"));
        assert_eq!(data.ingredients, vec!["flour", "sugar", "chocolate chips"]);
        assert_eq!(
            data.steps,
            vec!["Mix ingredients.", "Bake at 350F for 10 minutes."]
        );
        assert_eq!(data.image.as_deref(), Some("https://example.com/cookie.jpg"));
    }

    #[test]
    fn test_parse_recipe_in_array_with_howto_steps() {
        let data = parse_blocks(&[r#"
        [
            {"@type": "WebSite", "name": "Recipe Website"},
            {
                "@type": "Recipe",
                "name": "Pasta Carbonara",
                "image": ["https://example.com/carbonara1.jpg", "https://example.com/carbonara2.jpg"],
                "recipeIngredient": ["spaghetti", "eggs"],
                "recipeInstructions": [
                    {"@type": "HowToStep", "text": "Cook pasta"},
                    "Fry bacon",
                    {"@type": "HowToStep", "name": "Combine"},
                    42
                ]
            }
        ]
        "#]);

        assert_eq!(data.title.as_deref(), Some("Pasta Carbonara"));
        assert_eq!(data.steps, vec!["Cook pasta", "Fry bacon", "Combine"]);
        assert_eq!(
            data.image.as_deref(),
            Some("https://example.com/carbonara1.jpg")
        );
    }

    #[test]
    fn test_howto_sections_are_flattened() {
        let data = parse_blocks(&[r#"
        {
            "@type": "Recipe",
            "recipeInstructions": [
                {
                    "@type": "HowToSection",
                    "name": "For the sauce",
                    "itemListElement": [
                        {"@type": "HowToStep", "text": "Melt butter"},
                        {"@type": "HowToStep", "text": "Whisk in flour"}
                    ]
                },
                {"@type": "HowToStep", "text": "Pour over pasta"}
            ]
        }
        "#]);

        assert_eq!(
            data.steps,
            vec!["Melt butter", "Whisk in flour", "Pour over pasta"]
        );
    }

    #[test]
    fn test_graph_and_type_arrays() {
        let data = parse_blocks(&[r#"
        {
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebPage", "name": "Page"},
                {"@type": ["Recipe", "NewsArticle"], "name": "Graph Soup", "recipeIngredient": ["water"]}
            ]
        }
        "#]);

        assert_eq!(data.title.as_deref(), Some("Graph Soup"));
        assert_eq!(data.ingredients, vec!["water"]);
    }

    #[test]
    fn test_lowercase_recipe_type() {
        let data = parse_blocks(&[r#"{"@type": "recipe", "name": "Black Bean Soup"}"#]);
        assert_eq!(data.title.as_deref(), Some("Black Bean Soup"));
    }

    #[test]
    fn test_invalid_block_is_skipped() {
        let data = parse_blocks(&[
            r#"{"@type": "Recipe", "name": "Broken", "recipeIngredient": [}"#,
            r#"{"@type": "Recipe", "name": "Valid", "recipeIngredient": ["salt"]}"#,
        ]);

        assert_eq!(data.title.as_deref(), Some("Valid"));
        assert_eq!(data.ingredients, vec!["salt"]);
    }

    #[test]
    fn test_scan_stops_after_first_block_with_content() {
        let data = parse_blocks(&[
            r#"{"@type": "Recipe", "name": "Name Only"}"#,
            r#"{"@type": "Recipe", "name": "Second", "recipeIngredient": ["rice"], "image": "https://example.com/2.jpg"}"#,
            r#"{"@type": "Recipe", "name": "Third", "recipeIngredient": ["beans"]}"#,
        ]);

        assert_eq!(data.title.as_deref(), Some("Name Only"));
        assert_eq!(data.ingredients, vec!["rice"]);
        assert_eq!(data.image.as_deref(), Some("https://example.com/2.jpg"));
    }

    #[test]
    fn test_commented_block_is_unwrapped() {
        let data = parse_blocks(&[
            r#"<!-- {"@type": "Recipe", "name": "Wrapped", "recipeIngredient": ["oats"]} -->"#,
        ]);
        assert_eq!(data.ingredients, vec!["oats"]);
    }

    #[test]
    fn test_cdata_block_is_unwrapped() {
        let data = parse_blocks(&[
            r#"<![CDATA[ {"@type": "Recipe", "name": "Porridge", "recipeIngredient": ["oats", "milk"]} ]]>"#,
        ]);
        assert_eq!(data.title.as_deref(), Some("Porridge"));
        assert_eq!(data.ingredients, vec!["oats", "milk"]);
    }

    #[test]
    fn test_script_commented_cdata_block_is_unwrapped() {
        let data = parse_blocks(&[r#"
            //<![CDATA[
            {"@type": "Recipe", "name": "Flatbread", "recipeInstructions": ["Knead", "Grill"]}
            //]]>
        "#]);
        assert_eq!(data.title.as_deref(), Some("Flatbread"));
        assert_eq!(data.steps, vec!["Knead", "Grill"]);
    }

    #[test]
    fn test_unwrap_markup_forms() {
        assert_eq!(unwrap_markup(" <!-- {\"a\":1} --> "), "{\"a\":1}");
        assert_eq!(unwrap_markup("<![CDATA[{\"a\":1}]]>"), "{\"a\":1}");
        assert_eq!(unwrap_markup("//<![CDATA[\n{\"a\":1}\n//]]>"), "{\"a\":1}");
        assert_eq!(unwrap_markup("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_mismatched_field_shapes_are_absent() {
        let data = parse_blocks(&[r##"
        {
            "@type": "Recipe",
            "name": {"text": "not a string"},
            "recipeIngredient": ["1 cup rice", 2, null, "Salt &amp; pepper"],
            "recipeInstructions": {"unexpected": true},
            "image": {"@id": "#primaryimage"}
        }
        "##]);

        assert_eq!(data.title, None);
        assert_eq!(data.ingredients, vec!["1 cup rice", "Salt & pepper"]);
        assert!(data.steps.is_empty());
        assert_eq!(data.image, None);
    }

    #[test]
    fn test_image_shapes() {
        let object = parse_blocks(&[
            r#"{"@type": "Recipe", "image": {"@type": "ImageObject", "url": "https://example.com/obj.jpg"}}"#,
        ]);
        let list_of_objects = parse_blocks(&[
            r#"{"@type": "Recipe", "image": [{"url": "https://example.com/first.jpg"}, "https://example.com/second.jpg"]}"#,
        ]);

        assert_eq!(object.image.as_deref(), Some("https://example.com/obj.jpg"));
        assert_eq!(
            list_of_objects.image.as_deref(),
            Some("https://example.com/first.jpg")
        );
    }

    #[test]
    fn test_non_ld_scripts_are_ignored() {
        let html = r#"
        <html><head>
        <script type="text/javascript">var recipe = {"@type": "Recipe"};</script>
        <script type="application/LD+JSON">{"@type": "Recipe", "name": "Upper"}</script>
        </head></html>
        "#;
        let data = parse(&Html::parse_document(html));
        assert_eq!(data.title.as_deref(), Some("Upper"));
    }

    #[test]
    fn test_no_structured_data() {
        let data = parse(&Html::parse_document("<html><body><h1>Plain</h1></body></html>"));
        assert_eq!(data, StructuredData::default());
    }
}
