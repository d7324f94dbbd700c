//! Persistence boundary for extraction results.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use tokio::sync::Mutex;
use url::Url;

use crate::error::StoreError;
use crate::model::ExtractionResult;
use crate::normalize::normalize_list;

/// A stored extraction, as returned by a [`RecipeStore`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecipe {
    pub id: u64,
    pub user: String,
    pub source_url: String,
    pub recipe: ExtractionResult,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Insert or update the record keyed by `(user, source_url)`.
    ///
    /// Repeating an upsert with the same arguments leaves the record's id,
    /// content and creation time unchanged.
    async fn upsert(
        &self,
        user: &str,
        source_url: &str,
        recipe: &ExtractionResult,
        tags: &[String],
    ) -> Result<StoredRecipe, StoreError>;

    async fn get(&self, user: &str, source_url: &str) -> Result<Option<StoredRecipe>, StoreError>;
}

/// Canonical form of a source URL: parsed, fragment dropped.
pub fn canonical_source_url(source_url: &str) -> Result<String, StoreError> {
    let mut url = Url::parse(source_url.trim()).map_err(|source| StoreError::InvalidSourceUrl {
        url: source_url.to_string(),
        source,
    })?;
    url.set_fragment(None);
    Ok(url.to_string())
}

fn record_key(user: &str, source_url: &str) -> Result<(String, String), StoreError> {
    let user = user.trim();
    if user.is_empty() {
        return Err(StoreError::MissingUser);
    }
    Ok((user.to_string(), canonical_source_url(source_url)?))
}

#[derive(Default)]
struct StoreState {
    next_id: u64,
    records: HashMap<(String, String), StoredRecipe>,
}

/// In-process [`RecipeStore`].
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn upsert(
        &self,
        user: &str,
        source_url: &str,
        recipe: &ExtractionResult,
        tags: &[String],
    ) -> Result<StoredRecipe, StoreError> {
        let key = record_key(user, source_url)?;
        let now = Utc::now();
        let mut state = self.state.lock().await;

        if let Some(existing) = state.records.get_mut(&key) {
            existing.tags = normalize_list(existing.tags.iter().chain(tags));
            existing.recipe = recipe.clone();
            existing.updated_at = now;
            debug!("Updated recipe {} for {}", existing.id, key.0);
            return Ok(existing.clone());
        }

        state.next_id += 1;
        let stored = StoredRecipe {
            id: state.next_id,
            user: key.0.clone(),
            source_url: key.1.clone(),
            recipe: recipe.clone(),
            tags: normalize_list(tags),
            created_at: now,
            updated_at: now,
        };
        debug!("Stored recipe {} for {}", stored.id, stored.user);
        state.records.insert(key, stored.clone());
        Ok(stored)
    }

    async fn get(&self, user: &str, source_url: &str) -> Result<Option<StoredRecipe>, StoreError> {
        let key = record_key(user, source_url)?;
        Ok(self.state.lock().await.records.get(&key).cloned())
    }
}
