use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::forms::FormData,
    models::recipe::{CreateRecipeRequest, NewRecipe},
    storage::ImageStore,
    store::{RecipeStore, RecipeViews},
    utils::{jwt::Claims, sanitize::clean_text},
};

/// List all recipes, newest first, each annotated with whether the
/// *requesting* user has favorited it and with the author's display fields.
pub async fn list_recipes(
    State(views): State<RecipeViews>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let recipes = views.list_all(claims.user_id()).await?;

    Ok(Json(recipes))
}

/// Create a new recipe from a multipart form (text fields plus an optional
/// image). The image is uploaded before the row is inserted.
pub async fn create_recipe(
    State(recipes): State<RecipeStore>,
    State(images): State<Option<ImageStore>>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = FormData::read(&mut multipart).await?;

    let payload = CreateRecipeRequest {
        title: form.require("title")?,
        description: form.get("description"),
        ingredients: form.require("ingredients")?,
        instructions: form.require("instructions")?,
    };

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let image_url = match form.image {
        Some(image) => {
            let relay = images.ok_or_else(|| {
                AppError::InternalServerError("Image storage is not configured".to_string())
            })?;
            Some(
                relay
                    .store(
                        "recipe-images",
                        &image.file_name,
                        &image.content_type,
                        image.data,
                    )
                    .await?,
            )
        }
        None => None,
    };

    let recipe = recipes
        .create(NewRecipe {
            user_id: claims.user_id(),
            title: clean_text(&payload.title),
            description: payload.description.as_deref().map(clean_text),
            ingredients: clean_text(&payload.ingredients),
            instructions: clean_text(&payload.instructions),
            image_url,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Recipe created and shared successfully",
            "recipe": recipe,
        })),
    ))
}

/// List the current user's own recipes, newest first. No favorite
/// annotation on this view.
pub async fn my_recipes(
    State(recipes): State<RecipeStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let list = recipes.list_by_owner(claims.user_id()).await?;

    Ok(Json(list))
}

/// Get a single recipe by ID, annotated for the requesting user.
pub async fn get_recipe(
    State(views): State<RecipeViews>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = views
        .get(id, claims.user_id())
        .await?
        .ok_or(AppError::NotFound("Recipe not found".to_string()))?;

    Ok(Json(recipe))
}
