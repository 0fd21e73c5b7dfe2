//! Composed read queries: recipes joined with their owner's public display
//! fields and annotated with the requesting user's favorite status.

use sqlx::PgPool;

use crate::{error::AppError, models::recipe::RecipeView};

/// Stateless, idempotent reads over recipes, users and favorites.
///
/// The `is_favorite` annotation is computed against the *requesting* user on
/// every call. Nothing is cached: two users viewing the same list must see
/// independent flags, and a user must see their own toggle reflected on the
/// next read.
#[derive(Clone)]
pub struct RecipeViews {
    pool: PgPool,
}

impl RecipeViews {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All recipes, newest first, annotated for the requesting user.
    pub async fn list_all(&self, requesting_user_id: i64) -> Result<Vec<RecipeView>, AppError> {
        let recipes = sqlx::query_as::<_, RecipeView>(
            r#"
            SELECT
                r.id, r.user_id, r.title, r.description, r.ingredients,
                r.instructions, r.image_url, r.created_at,
                u.username AS author,
                u.profile_image AS author_profile_image,
                EXISTS(
                    SELECT 1 FROM favorites f
                    WHERE f.user_id = $1 AND f.recipe_id = r.id
                ) AS is_favorite
            FROM recipes r
            JOIN users u ON r.user_id = u.id
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(requesting_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }

    /// A single recipe annotated for the requesting user, if it exists.
    pub async fn get(
        &self,
        recipe_id: i64,
        requesting_user_id: i64,
    ) -> Result<Option<RecipeView>, AppError> {
        let recipe = sqlx::query_as::<_, RecipeView>(
            r#"
            SELECT
                r.id, r.user_id, r.title, r.description, r.ingredients,
                r.instructions, r.image_url, r.created_at,
                u.username AS author,
                u.profile_image AS author_profile_image,
                EXISTS(
                    SELECT 1 FROM favorites f
                    WHERE f.user_id = $1 AND f.recipe_id = r.id
                ) AS is_favorite
            FROM recipes r
            JOIN users u ON r.user_id = u.id
            WHERE r.id = $2
            "#,
        )
        .bind(requesting_user_id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(recipe)
    }
}
