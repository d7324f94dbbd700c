use serde::{Deserialize, Serialize};

/// Best-effort structured record extracted from one recipe page.
///
/// List fields are ordered sets: deduplicated, in first-seen document order.
/// `title` and `image` are omitted from the JSON form when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

impl ExtractionResult {
    /// True when no field carries any content.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.ingredients.is_empty()
            && self.steps.is_empty()
            && self.image.is_none()
            && self.links.is_empty()
    }
}
