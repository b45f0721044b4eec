//! Browser-local state: favorites, kitchen-mode progress, and the toast
//! message carried across a navigation.
//!
//! This is a UX nicety, not a source of truth. Unavailable storage and
//! corrupt values degrade to "nothing persisted" and are only logged.
//! Two tabs writing the same key race; the last writer wins.

use crate::client::storage::KeyValueStore;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const FAVORITES_KEY: &str = "favoriteRecipes";
pub const KITCHEN_PROGRESS_NAMESPACE: &str = "kitchenProgress";
pub const TOAST_KEY: &str = "toast";

/// Checklist state for one recipe in kitchen mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenProgress {
    #[serde(default, deserialize_with = "truthy_flags")]
    pub ingredients_done: Vec<bool>,
    #[serde(default, deserialize_with = "truthy_flags")]
    pub steps_done: Vec<bool>,
}

impl KitchenProgress {
    /// All items unchecked.
    pub fn unchecked(ingredients: usize, steps: usize) -> Self {
        Self {
            ingredients_done: vec![false; ingredients],
            steps_done: vec![false; steps],
        }
    }

    /// Fit the flags to the recipe's current item counts. Flags for removed
    /// items are dropped; new items start unchecked.
    pub fn resized(mut self, ingredients: usize, steps: usize) -> Self {
        self.ingredients_done.resize(ingredients, false);
        self.steps_done.resize(steps, false);
        self
    }

    pub fn done_count(&self) -> usize {
        self.ingredients_done
            .iter()
            .chain(&self.steps_done)
            .filter(|done| **done)
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.ingredients_done.len() + self.steps_done.len()
    }

    /// `round(100 * done / total)`, or 0 for an empty checklist.
    pub fn completion_percent(&self) -> u8 {
        let total = self.total_count();
        if total == 0 {
            return 0;
        }
        (100.0 * self.done_count() as f64 / total as f64).round() as u8
    }
}

/// Stored flags may be anything a previous front end wrote; only `true`
/// (or a truthy number/string) counts as done.
fn truthy_flags<'de, D>(deserializer: D) -> Result<Vec<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .iter()
        .map(|v| match v {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
            Value::Null => false,
        })
        .collect())
}

pub fn kitchen_key(recipe_id: &str) -> String {
    format!("{KITCHEN_PROGRESS_NAMESPACE}:{recipe_id}")
}

/// Local persistence over an injected [`KeyValueStore`].
#[derive(Clone)]
pub struct LocalStore {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore").finish_non_exhaustive()
    }
}

impl LocalStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key, error = %e, "Local storage read failed");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            tracing::warn!(key, error = %e, "Local storage write failed");
        }
    }

    fn delete(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            tracing::debug!(key, error = %e, "Local storage remove failed");
        }
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        serde_json::from_str(&raw)
            .map_err(|e| tracing::debug!(key, error = %e, "Ignoring corrupt local value"))
            .ok()
    }

    // ─── Favorites ───────────────────────────────────────────────

    /// Favorite recipe IDs in the order they were added.
    pub fn favorites(&self) -> Vec<String> {
        self.stored_favorites().unwrap_or_default()
    }

    /// `None` when storage could not be read. Non-string entries are
    /// dropped one by one; a value that is not an array reads as empty.
    fn stored_favorites(&self) -> Option<Vec<String>> {
        let raw = match self.storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Some(Vec::new()),
            Err(e) => {
                tracing::debug!(key = FAVORITES_KEY, error = %e, "Local storage read failed");
                return None;
            }
        };

        let entries: Vec<Value> = serde_json::from_str(&raw)
            .map_err(|e| {
                tracing::debug!(key = FAVORITES_KEY, error = %e, "Ignoring corrupt local value")
            })
            .unwrap_or_default();
        Some(
            entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::String(id) => Some(id),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites().iter().any(|f| f == id)
    }

    /// Add or remove `id`. Returns `true` if it is now a favorite. When the
    /// stored list cannot be read nothing is written and `false` is returned.
    pub fn toggle_favorite(&self, id: &str) -> bool {
        let Some(mut favorites) = self.stored_favorites() else {
            tracing::warn!(id, "Favorites unreadable; toggle skipped");
            return false;
        };
        let now_favorite = if favorites.iter().any(|f| f == id) {
            favorites.retain(|f| f != id);
            false
        } else {
            favorites.push(id.to_string());
            true
        };

        match serde_json::to_string(&favorites) {
            Ok(encoded) => self.write(FAVORITES_KEY, &encoded),
            Err(e) => tracing::warn!(error = %e, "Failed to encode favorites"),
        }

        now_favorite
    }

    // ─── Kitchen Progress ────────────────────────────────────────

    pub fn load_progress(&self, recipe_id: &str) -> Option<KitchenProgress> {
        self.read_json(&kitchen_key(recipe_id))
    }

    pub fn save_progress(&self, recipe_id: &str, progress: &KitchenProgress) {
        match serde_json::to_string(progress) {
            Ok(encoded) => self.write(&kitchen_key(recipe_id), &encoded),
            Err(e) => tracing::warn!(error = %e, "Failed to encode kitchen progress"),
        }
    }

    pub fn clear_progress(&self, recipe_id: &str) {
        self.delete(&kitchen_key(recipe_id));
    }

    // ─── Toast ───────────────────────────────────────────────────

    /// Leave a message for the next page to show.
    pub fn set_toast(&self, message: &str) {
        self.write(TOAST_KEY, message);
    }

    /// Read the pending toast once; it is deleted as it is read.
    pub fn take_toast(&self) -> Option<String> {
        let message = self.read(TOAST_KEY)?;
        self.delete(TOAST_KEY);
        Some(message).filter(|m| !m.is_empty())
    }
}
