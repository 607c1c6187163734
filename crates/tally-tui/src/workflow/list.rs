use std::sync::Arc;

use tally_core::Category;
use tally_service::ServiceError;

/// The fetched collection plus a row cursor.
///
/// Refreshes replace the whole collection. Each fetch is tagged with a
/// generation so a slow, older fetch cannot overwrite a newer result.
#[derive(Debug, Clone, Default)]
pub struct CategoryList {
    categories: Arc<Vec<Category>>,
    cursor: Option<usize>,
    requested: u64,
    applied: u64,
    loaded: bool,
    fetch_error: Option<String>,
}

impl CategoryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> &Arc<Vec<Category>> {
        &self.categories
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// True once any fetch has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Message of the most recent failed fetch, cleared by the next success.
    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    pub fn selected(&self) -> Option<&Category> {
        self.categories.get(self.cursor?)
    }

    /// Reserve a generation number for a new fetch.
    pub fn request_refresh(&mut self) -> u64 {
        self.requested += 1;
        self.requested
    }

    /// Apply a fetch result. Returns whether the held collection changed.
    /// Failures and stale generations leave the collection as it was.
    pub fn apply(&mut self, generation: u64, result: Result<Vec<Category>, ServiceError>) -> bool {
        if generation <= self.applied {
            tracing::warn!(generation, applied = self.applied, "discarding stale category fetch");
            return false;
        }
        match result {
            Ok(categories) => {
                let selected_id = self.selected().map(|c| c.id.clone());
                self.applied = generation;
                self.categories = Arc::new(categories);
                self.loaded = true;
                self.fetch_error = None;
                self.restore_cursor(selected_id.as_deref());
                tracing::info!(count = self.categories.len(), generation, "category list refreshed");
                true
            }
            Err(e) => {
                tracing::warn!(generation, "category fetch failed: {e}");
                self.fetch_error = Some(e.to_string());
                false
            }
        }
    }

    fn restore_cursor(&mut self, selected_id: Option<&str>) {
        if self.categories.is_empty() {
            self.cursor = None;
            return;
        }
        let by_id = selected_id.and_then(|id| self.categories.iter().position(|c| c.id == id));
        let fallback = self.cursor.unwrap_or(0).min(self.categories.len() - 1);
        self.cursor = Some(by_id.unwrap_or(fallback));
    }

    pub fn move_cursor(&mut self, delta: i32) {
        if self.categories.is_empty() {
            self.cursor = None;
            return;
        }
        let last = self.categories.len() as i64 - 1;
        let current = self.cursor.unwrap_or(0) as i64;
        self.cursor = Some((current + delta as i64).clamp(0, last) as usize);
    }
}
