// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe CRUD routes.
//!
//! Reads are public. Writes take an [`AuthUser`], and update/delete are
//! checked against the recipe's owner after the recipe is known to exist.

use crate::db::new_document_id;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{AuthenticatedUser, Recipe, RecipeInput, RecipeQuery};
use crate::routes::OkResponse;
use crate::services::{authorize, Decision};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// Recipe routes. Auth is enforced per handler by the `AuthUser` extractor.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/{id}",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

/// List recipes, newest first, optionally filtered by `search` and `category`.
async fn list_recipes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecipeQuery>,
) -> Result<Json<Vec<Recipe>>> {
    let query = query.normalized();
    tracing::debug!(search = ?query.search, category = ?query.category, "Listing recipes");

    Ok(Json(state.db.list_recipes(&query).await?))
}

async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>> {
    Ok(Json(find_recipe(&state, &id).await?))
}

async fn create_recipe(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    body: std::result::Result<Json<RecipeInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Recipe>)> {
    let Json(input) = body?;
    let fields = input.normalize().ok_or_else(AppError::missing_fields)?;

    let recipe = Recipe::new(new_document_id()?, fields, &user, &now_rfc3339());
    state.db.save_recipe(&recipe).await?;

    tracing::info!(recipe_id = %recipe.id, uid = %user.uid, "Recipe created");

    Ok((StatusCode::CREATED, Json(recipe)))
}

async fn update_recipe(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    body: std::result::Result<Json<RecipeInput>, JsonRejection>,
) -> Result<Json<Recipe>> {
    let Json(input) = body?;
    let fields = input.normalize().ok_or_else(AppError::missing_fields)?;

    let mut recipe = find_recipe(&state, &id).await?;
    ensure_owner(&recipe, &user)?;

    recipe.apply(fields, &now_rfc3339());
    state.db.save_recipe(&recipe).await?;

    tracing::info!(recipe_id = %recipe.id, uid = %user.uid, "Recipe updated");

    Ok(Json(recipe))
}

async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>> {
    let recipe = find_recipe(&state, &id).await?;
    ensure_owner(&recipe, &user)?;

    state.db.delete_recipe(&recipe.id).await?;

    tracing::info!(recipe_id = %recipe.id, uid = %user.uid, "Recipe deleted");

    Ok(Json(OkResponse::ok()))
}

async fn find_recipe(state: &AppState, id: &str) -> Result<Recipe> {
    state
        .db
        .get_recipe(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))
}

fn ensure_owner(recipe: &Recipe, user: &AuthenticatedUser) -> Result<()> {
    match authorize(recipe.owner(), &user.uid) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            tracing::warn!(
                recipe_id = %recipe.id,
                uid = %user.uid,
                reason = ?reason,
                "Recipe mutation denied"
            );
            Err(AppError::Forbidden(reason.message().to_string()))
        }
    }
}
