use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'recipes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,

    /// Free text; the client imposes newline-delimited list semantics.
    pub ingredients: String,
    pub instructions: String,

    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A recipe annotated for display: the owner's public fields plus whether the
/// *requesting* user has favorited it. Produced only by the view queries, so
/// the flag is always evaluated against the caller of the moment.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,

    pub author: String,
    pub author_profile_image: Option<String>,
    pub is_favorite: bool,
}

/// A favorited recipe joined with its author, for the favorites listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FavoriteRecipe {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,

    pub author: String,
    pub author_profile_image: Option<String>,
    pub favorited_at: chrono::DateTime<chrono::Utc>,
}

/// Fields for a new recipe row.
#[derive(Debug)]
pub struct NewRecipe {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub image_url: Option<String>,
}

/// DTO for creating a recipe, assembled from the multipart form.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRecipeRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required."))]
    pub title: String,

    pub description: Option<String>,

    #[validate(length(min = 1, message = "Ingredients are required."))]
    pub ingredients: String,

    #[validate(length(min = 1, message = "Instructions are required."))]
    pub instructions: String,
}
