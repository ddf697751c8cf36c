//! Recipe CRUD handlers

use crate::error::StoreError;
use crate::server::handlers::{with_store, ApiError, MessageBody};
use crate::server::ServerState;
use crate::types::{Recipe, RecipeFields, RecipeId};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

/// Turn a body extraction failure into a validation error.
fn decode_fields(payload: Result<Json<RecipeFields>, JsonRejection>) -> Result<RecipeFields, ApiError> {
    let Json(fields) = payload
        .map_err(|rejection| StoreError::Validation(rejection.body_text()))?;
    fields.validate()?;
    Ok(fields)
}

/// List all recipes
///
/// GET /api/recipes
pub async fn list_recipes(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = with_store(&state, |store| store.list_all()).await?;
    debug!("Listing {} recipes", recipes.len());
    Ok(Json(recipes))
}

/// Get a single recipe
///
/// GET /api/recipes/:id
pub async fn get_recipe(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let id = RecipeId::from(id);
    let recipe = with_store(&state, move |store| store.get_by_id(&id)).await?;
    Ok(Json(recipe))
}

/// Create a recipe
///
/// POST /api/recipes
pub async fn create_recipe(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<RecipeFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let fields = decode_fields(payload)?;

    let recipe = with_store(&state, move |store| store.create(fields))
        .await
        .map_err(|e| ApiError::on_write(e, "Failed to save recipe"))?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Replace a recipe
///
/// PUT /api/recipes/:id
pub async fn update_recipe(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    payload: Result<Json<RecipeFields>, JsonRejection>,
) -> Result<Json<Recipe>, ApiError> {
    let fields = decode_fields(payload)?;
    let id = RecipeId::from(id);

    let recipe = with_store(&state, move |store| store.update(&id, fields))
        .await
        .map_err(|e| ApiError::on_write(e, "Failed to update recipe"))?;

    Ok(Json(recipe))
}

/// Delete a recipe
///
/// DELETE /api/recipes/:id
pub async fn delete_recipe(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = RecipeId::from(id);

    with_store(&state, move |store| store.delete(&id))
        .await
        .map_err(|e| ApiError::on_write(e, "Failed to delete recipe"))?;

    Ok(Json(MessageBody::new("Recipe deleted successfully")))
}
