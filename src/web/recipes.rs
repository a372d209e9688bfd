//! Recipe API handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::{ActiveModelTrait, IntoActiveModel, ModelTrait, Set};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::AppState;
use super::middleware::RequestUser;
use crate::audit;
use crate::db::entities::recipes;
use crate::error::SaucierError;
use crate::generation::{CookingStep, GenerationRequest, Ingredient};
use crate::images;

/// Generates a recipe for the caller.
///
/// Long-running by design: two generative providers are called in series,
/// so the fronting layer must allow this route a timeout on the order of
/// two minutes. If the caller disconnects mid-flight the pipeline still
/// runs to completion and the result is simply dropped with the
/// connection; the recipe row is only written after both provider stages,
/// so no partial row can be left behind.
pub(crate) async fn generate_recipe(
    State(state): State<AppState>,
    user: RequestUser,
    Json(request): Json<GenerationRequest>,
) -> Result<impl IntoResponse, SaucierError> {
    let recipe = state
        .pipeline
        .run(&state.db, &user.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[derive(Debug, Serialize)]
pub(crate) struct RecipeSummary {
    id: String,
    title: String,
    description: String,
    cuisine_type: String,
    difficulty: String,
    cooking_time: i32,
    is_favorite: bool,
    image_path: Option<String>,
    thumbnail_path: Option<String>,
    created_at: String,
}

/// Lists the caller's recipes, newest first.
pub(crate) async fn list_recipes(
    State(state): State<AppState>,
    user: RequestUser,
) -> Result<impl IntoResponse, SaucierError> {
    let rows = recipes::list_for_user(&state.db, &user.user_id).await?;
    let summaries: Vec<RecipeSummary> = rows
        .into_iter()
        .map(|row| RecipeSummary {
            id: row.id,
            title: row.title,
            description: row.description,
            cuisine_type: row.cuisine_type,
            difficulty: row.difficulty,
            cooking_time: row.cooking_time,
            is_favorite: row.is_favorite,
            image_path: row.image_path,
            thumbnail_path: row.thumbnail_path,
            created_at: row.created_at.to_string(),
        })
        .collect();

    Ok(Json(json!({ "recipes": summaries })))
}

/// Fetches one recipe with ingredients, steps and tags parsed out of
/// their stored JSON columns.
pub(crate) async fn get_recipe(
    State(state): State<AppState>,
    user: RequestUser,
    Path(recipe_id): Path<String>,
) -> Result<impl IntoResponse, SaucierError> {
    let row = recipes::find_owned(&state.db, &recipe_id, &user.user_id)
        .await?
        .ok_or(SaucierError::NotFound(recipe_id))?;

    let ingredients: Vec<Ingredient> =
        serde_json::from_str(&row.ingredients).unwrap_or_default();
    let steps: Vec<CookingStep> = serde_json::from_str(&row.steps).unwrap_or_default();
    let dietary_tags: Vec<String> = serde_json::from_str(&row.dietary_tags).unwrap_or_default();

    Ok(Json(json!({
        "id": row.id,
        "user_id": row.user_id,
        "title": row.title,
        "description": row.description,
        "ingredients": ingredients,
        "steps": steps,
        "serving_size": row.serving_size,
        "cooking_time": row.cooking_time,
        "difficulty": row.difficulty,
        "cuisine_type": row.cuisine_type,
        "meat_type": row.meat_type,
        "dietary_tags": dietary_tags,
        "is_favorite": row.is_favorite,
        "image_path": row.image_path,
        "thumbnail_path": row.thumbnail_path,
        "created_at": row.created_at.to_string(),
    })))
}

/// Deletes a recipe, then removes its stored media variants.
pub(crate) async fn delete_recipe(
    State(state): State<AppState>,
    user: RequestUser,
    Path(recipe_id): Path<String>,
) -> Result<impl IntoResponse, SaucierError> {
    let row = recipes::find_owned(&state.db, &recipe_id, &user.user_id)
        .await?
        .ok_or(SaucierError::NotFound(recipe_id.clone()))?;

    let title = row.title.clone();
    let variants: Vec<String> = [row.image_path.clone(), row.thumbnail_path.clone()]
        .into_iter()
        .flatten()
        .collect();

    row.delete(&state.db).await?;

    if !variants.is_empty() {
        let report = images::delete_variants(&state.media, &variants);
        if report.all_ok() {
            audit::record(
                "recipe.image_cleanup",
                &user.user_id,
                "Recipe images deleted from disk",
                json!({
                    "recipe_id": recipe_id,
                    "deleted_files": report.deleted,
                    "absent_files": report.absent,
                }),
            );
        } else {
            audit::record_warn(
                "recipe.image_cleanup",
                &user.user_id,
                "Recipe image cleanup left files behind",
                json!({
                    "recipe_id": recipe_id,
                    "deleted_files": report.deleted,
                    "failed_files": report.failed,
                }),
            );
        }
    }

    audit::record(
        "recipe.delete",
        &user.user_id,
        "Recipe deleted",
        json!({ "recipe_id": recipe_id, "recipe_title": title }),
    );

    Ok(Json(json!({ "message": "Recipe deleted successfully" })))
}

/// Toggles the favorite flag on a recipe.
pub(crate) async fn toggle_favorite(
    State(state): State<AppState>,
    user: RequestUser,
    Path(recipe_id): Path<String>,
) -> Result<impl IntoResponse, SaucierError> {
    let row = recipes::find_owned(&state.db, &recipe_id, &user.user_id)
        .await?
        .ok_or(SaucierError::NotFound(recipe_id.clone()))?;

    let title = row.title.clone();
    let new_state = !row.is_favorite;
    let mut active = row.into_active_model();
    active.is_favorite = Set(new_state);
    active.update(&state.db).await?;

    debug!("Favorite toggled for {recipe_id}");
    audit::record(
        "recipe.favorite_toggle",
        &user.user_id,
        "Recipe favorite status toggled",
        json!({
            "recipe_id": recipe_id,
            "recipe_title": title,
            "new_is_favorite": new_state,
        }),
    );

    Ok(Json(json!({ "message": "Favorite status updated" })))
}

/// Available cuisine styles.
pub(crate) async fn list_cuisines() -> impl IntoResponse {
    Json(json!({
        "cuisines": [
            "Italian", "Mexican", "Chinese", "Indian", "Japanese",
            "Thai", "Mediterranean", "American", "French", "Greek",
            "Korean", "Vietnamese", "Spanish", "Middle Eastern",
        ]
    }))
}

/// Available main proteins.
pub(crate) async fn list_meat_types() -> impl IntoResponse {
    Json(json!({
        "meat_types": [
            "Chicken", "Beef", "Pork", "Fish", "Seafood",
            "Lamb", "Turkey", "None (Vegetarian)",
        ]
    }))
}

/// Available side ingredients.
pub(crate) async fn list_side_ingredients() -> impl IntoResponse {
    Json(json!({
        "ingredients": [
            "Vegetables", "Rice", "Pasta", "Potatoes", "Grains",
            "Legumes", "Noodles", "Bread", "Quinoa", "Couscous",
        ]
    }))
}
