use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    store::{FavoriteStore, RecipeStore},
    utils::jwt::Claims,
};

/// Add a recipe to the current user's favorites.
///
/// The insert itself is idempotent; a pair that already exists is surfaced
/// to the caller as a client error rather than a second row.
pub async fn add_favorite(
    State(favorites): State<FavoriteStore>,
    State(recipes): State<RecipeStore>,
    Extension(claims): Extension<Claims>,
    Path(recipe_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    recipes
        .find_by_id(recipe_id)
        .await?
        .ok_or(AppError::NotFound("Recipe not found".to_string()))?;

    let created = favorites.add(claims.user_id(), recipe_id).await?;

    if !created {
        return Err(AppError::BadRequest(
            "Recipe is already in favorites".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Recipe added to favorites" })))
}

/// Remove a recipe from the current user's favorites.
pub async fn remove_favorite(
    State(favorites): State<FavoriteStore>,
    Extension(claims): Extension<Claims>,
    Path(recipe_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let removed = favorites.remove(claims.user_id(), recipe_id).await?;

    if !removed {
        return Err(AppError::BadRequest(
            "Recipe is not in favorites".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Recipe removed from favorites" })))
}

/// List the current user's favorited recipes, most recently favorited first.
pub async fn list_favorites(
    State(favorites): State<FavoriteStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let list = favorites.list_for_user(claims.user_id()).await?;

    Ok(Json(list))
}

/// Whether the current user has favorited one recipe.
pub async fn is_favorite(
    State(favorites): State<FavoriteStore>,
    Extension(claims): Extension<Claims>,
    Path(recipe_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let favorite = favorites.is_favorite(claims.user_id(), recipe_id).await?;

    Ok(Json(json!({ "isFavorite": favorite })))
}
