//! Add/edit recipe form and the delete action.

use crate::client::api::{ClientError, RecipeSource};
use crate::client::auth::AuthContext;
use crate::client::local_store::LocalStore;
use crate::models::{Recipe, RecipeFields};
use std::sync::Arc;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and Category are required";
pub const LOGIN_FIRST_TOAST: &str = "Please login first 🔐";
pub const SESSION_EXPIRED_TOAST: &str = "Session expired — please login again 🔐";
pub const NOT_OWNER_MESSAGE: &str = "You can only edit your own recipes.";
pub const CREATED_TOAST: &str = "Recipe created ✅";
pub const UPDATED_TOAST: &str = "Recipe updated ✅";
pub const DELETED_TOAST: &str = "Recipe deleted 🗑️";

/// Form contents as typed. Ingredients and instructions are one item per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub category: String,
    pub prep_minutes: String,
    pub image_url: String,
    pub ingredients_text: String,
    pub instructions_text: String,
}

impl RecipeDraft {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            category: recipe.category.clone(),
            prep_minutes: recipe.prep_minutes.to_string(),
            image_url: recipe.image_url.clone(),
            ingredients_text: recipe.ingredients.join("\n"),
            instructions_text: recipe.instructions.join("\n"),
        }
    }

    /// Request body for the draft, or a validation message.
    pub fn to_fields(&self) -> Result<RecipeFields, EditorError> {
        let title = self.title.trim();
        let category = self.category.trim();
        if title.is_empty() || category.is_empty() {
            return Err(EditorError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        Ok(RecipeFields {
            title: title.to_string(),
            category: category.to_string(),
            prep_minutes: parse_minutes(&self.prep_minutes),
            image_url: self.image_url.trim().to_string(),
            ingredients: lines(&self.ingredients_text),
            instructions: lines(&self.instructions_text),
        })
    }
}

fn parse_minutes(text: &str) -> u32 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite() && *m > 0.0)
        .map(|m| m.min(f64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

fn lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inline form errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Navigate to the recipe page.
    Saved { id: String },
    /// Navigate to the login page; a toast explains why.
    LoginRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    LoginRequired,
}

pub struct RecipeEditor {
    source: Arc<dyn RecipeSource>,
    auth: Arc<AuthContext>,
    store: LocalStore,
}

impl RecipeEditor {
    pub fn new(source: Arc<dyn RecipeSource>, auth: Arc<AuthContext>, store: LocalStore) -> Self {
        Self {
            source,
            auth,
            store,
        }
    }

    /// Pre-fill the form for editing `id`.
    pub async fn load_draft(&self, id: &str) -> Result<RecipeDraft, EditorError> {
        match self.source.get(id).await {
            Ok(Some(recipe)) => Ok(RecipeDraft::from_recipe(&recipe)),
            Ok(None) => Err(EditorError::Failed("Recipe not found".to_string())),
            Err(e) => Err(EditorError::Failed(e.to_string())),
        }
    }

    /// Create (`editing` is `None`) or update a recipe from the draft.
    pub async fn submit(
        &self,
        editing: Option<&str>,
        draft: &RecipeDraft,
    ) -> Result<SubmitOutcome, EditorError> {
        let fields = draft.to_fields()?;

        let Some(token) = self.auth.get_token().await else {
            self.store.set_toast(LOGIN_FIRST_TOAST);
            return Ok(SubmitOutcome::LoginRequired);
        };

        let result = match editing {
            Some(id) => self.source.update(id, &fields, &token).await,
            None => self.source.create(&fields, &token).await,
        };

        match result {
            Ok(saved) => {
                self.store.set_toast(if editing.is_some() {
                    UPDATED_TOAST
                } else {
                    CREATED_TOAST
                });
                Ok(SubmitOutcome::Saved { id: saved.id })
            }
            Err(ClientError::Unauthorized) => {
                self.store.set_toast(SESSION_EXPIRED_TOAST);
                Ok(SubmitOutcome::LoginRequired)
            }
            Err(ClientError::Forbidden(_)) => {
                Err(EditorError::Forbidden(NOT_OWNER_MESSAGE.to_string()))
            }
            Err(e) => Err(EditorError::Failed(failure_message(e, "Failed to save recipe"))),
        }
    }

    /// Delete `id` after `confirm` agrees.
    pub async fn delete(
        &self,
        id: &str,
        confirm: impl FnOnce() -> bool,
    ) -> Result<DeleteOutcome, EditorError> {
        if !confirm() {
            return Ok(DeleteOutcome::Cancelled);
        }

        let Some(token) = self.auth.get_token().await else {
            self.store.set_toast(LOGIN_FIRST_TOAST);
            return Ok(DeleteOutcome::LoginRequired);
        };

        match self.source.delete(id, &token).await {
            Ok(()) => {
                self.store.set_toast(DELETED_TOAST);
                Ok(DeleteOutcome::Deleted)
            }
            Err(ClientError::Unauthorized) => {
                self.store.set_toast(SESSION_EXPIRED_TOAST);
                Ok(DeleteOutcome::LoginRequired)
            }
            Err(ClientError::Forbidden(message)) => Err(EditorError::Forbidden(message)),
            Err(e) => Err(EditorError::Failed(failure_message(e, "Failed to delete"))),
        }
    }
}

/// Server message when there is one, otherwise `fallback`.
fn failure_message(error: ClientError, fallback: &str) -> String {
    match error {
        ClientError::Validation(message) | ClientError::Unexpected { message, .. }
            if !message.is_empty() =>
        {
            message
        }
        _ => fallback.to_string(),
    }
}
