//! Favorite index: the many-to-many relation between users and the recipes
//! they have bookmarked, unique per (user, recipe) pair.

use sqlx::PgPool;

use crate::{error::AppError, models::recipe::FavoriteRecipe};

#[derive(Clone)]
pub struct FavoriteStore {
    pool: PgPool,
}

impl FavoriteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent insert. Returns whether a row was actually created, so the
    /// caller can distinguish "newly added" from "already a favorite".
    /// `ON CONFLICT DO NOTHING` also absorbs the concurrent double-add race.
    pub async fn add(&self, user_id: i64, recipe_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, recipe_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, recipe_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Returns whether a row existed to remove.
    pub async fn remove(&self, user_id: i64, recipe_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM favorites
            WHERE user_id = $1 AND recipe_id = $2
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn is_favorite(&self, user_id: i64, recipe_id: i64) -> Result<bool, AppError> {
        let favorite = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM favorites
                WHERE user_id = $1 AND recipe_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(favorite)
    }

    /// The user's favorited recipes joined with their authors, most recently
    /// favorited first.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<FavoriteRecipe>, AppError> {
        let favorites = sqlx::query_as::<_, FavoriteRecipe>(
            r#"
            SELECT
                r.id, r.user_id, r.title, r.description, r.ingredients,
                r.instructions, r.image_url, r.created_at,
                u.username AS author,
                u.profile_image AS author_profile_image,
                f.created_at AS favorited_at
            FROM recipes r
            JOIN favorites f ON r.id = f.recipe_id
            JOIN users u ON r.user_id = u.id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC, f.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(favorites)
    }
}
