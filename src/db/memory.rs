// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process recipe store.
//!
//! Used by tests and by local runs without GCP credentials. Provides the
//! same per-document atomicity Firestore does and nothing more.

use crate::models::{Recipe, RecipeQuery};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Entry {
    /// Insertion order, used to break `created_at` ties.
    seq: u64,
    recipe: Recipe,
}

/// Recipes keyed by document ID.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecipes {
    docs: Arc<DashMap<String, Entry>>,
    next_seq: Arc<AtomicU64>,
}

impl MemoryRecipes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matching recipes, newest first.
    pub fn list(&self, query: &RecipeQuery) -> Vec<Recipe> {
        let mut entries: Vec<Entry> = self
            .docs
            .iter()
            .filter(|e| query.matches(&e.value().recipe))
            .map(|e| e.value().clone())
            .collect();

        entries.sort_by(|a, b| {
            b.recipe
                .created_at
                .cmp(&a.recipe.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        entries.into_iter().map(|e| e.recipe).collect()
    }

    pub fn get(&self, id: &str) -> Option<Recipe> {
        self.docs.get(id).map(|e| e.recipe.clone())
    }

    /// Insert or replace. A replaced document keeps its original position.
    pub fn put(&self, recipe: &Recipe) {
        let seq = self
            .docs
            .get(&recipe.id)
            .map(|e| e.seq)
            .unwrap_or_else(|| self.next_seq.fetch_add(1, Ordering::Relaxed));

        self.docs.insert(
            recipe.id.clone(),
            Entry {
                seq,
                recipe: recipe.clone(),
            },
        );
    }

    /// Returns `true` if a document was removed.
    pub fn remove(&self, id: &str) -> bool {
        self.docs.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: &str, title: &str, created_at: &str) -> Recipe {
        Recipe {
            id: id.into(),
            title: title.into(),
            category: "Dinner".into(),
            prep_minutes: 0,
            image_url: String::new(),
            ingredients: vec![],
            instructions: vec![],
            owner_id: Some("u1".into()),
            owner_name: None,
            owner_email: None,
            created_at: created_at.into(),
            updated_at: created_at.into(),
        }
    }

    #[test]
    fn test_list_newest_first_with_insertion_tiebreak() {
        let store = MemoryRecipes::new();
        store.put(&recipe("a", "Old", "2024-01-01T00:00:00.000Z"));
        store.put(&recipe("b", "Same 1", "2024-02-01T00:00:00.000Z"));
        store.put(&recipe("c", "Same 2", "2024-02-01T00:00:00.000Z"));

        let ids: Vec<String> = store
            .list(&RecipeQuery::default())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_replace_keeps_position_and_remove() {
        let store = MemoryRecipes::new();
        store.put(&recipe("a", "First", "2024-01-01T00:00:00.000Z"));
        store.put(&recipe("b", "Second", "2024-01-01T00:00:00.000Z"));
        store.put(&recipe("a", "First (edited)", "2024-01-01T00:00:00.000Z"));

        let titles: Vec<String> = store
            .list(&RecipeQuery::default())
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First (edited)"]);

        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert_eq!(store.len(), 1);
    }
}
