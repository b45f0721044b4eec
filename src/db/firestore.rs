// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe store with typed operations.
//!
//! Backed by Firestore in production (or the emulator), by an in-process
//! map in tests and local runs, or by nothing at all (offline mock).

use crate::db::{collections, MemoryRecipes};
use crate::error::AppError;
use crate::models::{Recipe, RecipeDocument, RecipeQuery};

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(MemoryRecipes),
    Offline,
}

/// Recipe database handle. Cheap to clone; one per process.
#[derive(Clone)]
pub struct RecipeDb {
    backend: Backend,
}

impl RecipeDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator rejects real credentials, so skip the credential lookup entirely.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a store that keeps recipes in process memory.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryRecipes::new()),
        }
    }

    /// Create a mock store for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    /// Helper to get the Firestore client, if that is the backend.
    fn firestore(&self) -> Result<Option<&firestore::FirestoreDb>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => Ok(Some(client)),
            Backend::Memory(_) => Ok(None),
            Backend::Offline => Err(AppError::Database(
                "Database not connected (offline mode)".to_string(),
            )),
        }
    }

    fn memory(&self) -> Option<&MemoryRecipes> {
        match &self.backend {
            Backend::Memory(store) => Some(store),
            _ => None,
        }
    }

    // ─── Recipe Operations ───────────────────────────────────────

    /// List recipes matching `query`, newest first.
    ///
    /// Firestore has no case-insensitive substring match, so the whole
    /// collection is read and filtered here.
    pub async fn list_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, AppError> {
        let Some(client) = self.firestore()? else {
            return Ok(self.memory().map(|m| m.list(query)).unwrap_or_default());
        };

        let docs: Vec<RecipeDocument> = client
            .fluent()
            .select()
            .from(collections::RECIPES)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut recipes: Vec<Recipe> = docs
            .into_iter()
            .map(|doc| doc.into_recipe(""))
            .filter(|recipe| query.matches(recipe))
            .collect();

        // Documents lacking `createdAt` sort last.
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(recipes)
    }

    /// Get a recipe by document ID.
    pub async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>, AppError> {
        if !is_valid_document_id(id) {
            return Ok(None);
        }

        let Some(client) = self.firestore()? else {
            return Ok(self.memory().and_then(|m| m.get(id)));
        };

        let doc: Option<RecipeDocument> = client
            .fluent()
            .select()
            .by_id_in(collections::RECIPES)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(doc.map(|doc| doc.into_recipe(id)))
    }

    /// Create or overwrite a recipe document.
    pub async fn save_recipe(&self, recipe: &Recipe) -> Result<(), AppError> {
        let Some(client) = self.firestore()? else {
            if let Some(memory) = self.memory() {
                memory.put(recipe);
            }
            return Ok(());
        };

        let doc = RecipeDocument::from(recipe);
        let _: () = client
            .fluent()
            .update()
            .in_col(collections::RECIPES)
            .document_id(&recipe.id)
            .object(&doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a recipe document. Deleting a missing document is not an error.
    pub async fn delete_recipe(&self, id: &str) -> Result<(), AppError> {
        let Some(client) = self.firestore()? else {
            if let Some(memory) = self.memory() {
                memory.remove(id);
            }
            return Ok(());
        };

        client
            .fluent()
            .delete()
            .from(collections::RECIPES)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Firestore rejects IDs containing `/` and the reserved `.`/`..`; those can
/// never name an existing recipe.
fn is_valid_document_id(id: &str) -> bool {
    !id.is_empty() && !id.contains('/') && id != "." && id != ".." && id.len() <= 1500
}
