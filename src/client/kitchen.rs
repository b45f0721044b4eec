//! Recipe detail page with kitchen-mode checklists.

use crate::client::api::RecipeSource;
use crate::client::local_store::{KitchenProgress, LocalStore};
use crate::models::Recipe;

/// Detail page state. `NotFound` is terminal.
#[derive(Debug)]
pub enum RecipeView {
    Loading,
    Loaded(KitchenSession),
    NotFound,
}

impl RecipeView {
    /// Fetch the recipe and restore its checklist. A missing recipe and a
    /// failed fetch both end in `NotFound`.
    pub async fn load(source: &dyn RecipeSource, store: LocalStore, id: &str) -> Self {
        match source.get(id).await {
            Ok(Some(recipe)) => RecipeView::Loaded(KitchenSession::restore(recipe, store)),
            Ok(None) => RecipeView::NotFound,
            Err(e) => {
                tracing::warn!(recipe_id = %id, error = %e, "Failed to load recipe");
                RecipeView::NotFound
            }
        }
    }

    pub fn session(&self) -> Option<&KitchenSession> {
        match self {
            RecipeView::Loaded(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut KitchenSession> {
        match self {
            RecipeView::Loaded(session) => Some(session),
            _ => None,
        }
    }
}

/// A loaded recipe and its checklist. Every toggle is persisted at once.
#[derive(Debug)]
pub struct KitchenSession {
    recipe: Recipe,
    progress: KitchenProgress,
    store: LocalStore,
}

impl KitchenSession {
    /// Resume saved progress, fitted to the recipe's current item counts.
    pub fn restore(recipe: Recipe, store: LocalStore) -> Self {
        let (ingredients, steps) = (recipe.ingredients.len(), recipe.instructions.len());
        let progress = store
            .load_progress(&recipe.id)
            .map(|saved| saved.resized(ingredients, steps))
            .unwrap_or_else(|| KitchenProgress::unchecked(ingredients, steps));

        Self {
            recipe,
            progress,
            store,
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn progress(&self) -> &KitchenProgress {
        &self.progress
    }

    /// Flip ingredient `index`. Returns its new state, or `None` if out of range.
    pub fn toggle_ingredient(&mut self, index: usize) -> Option<bool> {
        let flag = self.progress.ingredients_done.get_mut(index)?;
        *flag = !*flag;
        let now = *flag;
        self.persist();
        Some(now)
    }

    /// Flip step `index`. Returns its new state, or `None` if out of range.
    pub fn toggle_step(&mut self, index: usize) -> Option<bool> {
        let flag = self.progress.steps_done.get_mut(index)?;
        *flag = !*flag;
        let now = *flag;
        self.persist();
        Some(now)
    }

    pub fn completion_percent(&self) -> u8 {
        self.progress.completion_percent()
    }

    /// Uncheck everything and forget the saved record, if `confirm` agrees.
    /// Returns whether the reset happened.
    pub fn reset(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }
        self.progress = KitchenProgress::unchecked(
            self.recipe.ingredients.len(),
            self.recipe.instructions.len(),
        );
        self.store.clear_progress(&self.recipe.id);
        true
    }

    fn persist(&self) {
        self.store.save_progress(&self.recipe.id, &self.progress);
    }
}
