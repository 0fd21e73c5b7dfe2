//! Recipe store: rows owned by exactly one user, never updated or deleted
//! through the API surface.

use sqlx::PgPool;

use crate::{
    error::AppError,
    models::recipe::{NewRecipe, Recipe},
};

#[derive(Clone)]
pub struct RecipeStore {
    pool: PgPool,
}

impl RecipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new recipe. Id and creation timestamp are assigned by the
    /// database.
    pub async fn create(&self, new_recipe: NewRecipe) -> Result<Recipe, AppError> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (user_id, title, description, ingredients, instructions, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, description, ingredients, instructions, image_url, created_at
            "#,
        )
        .bind(new_recipe.user_id)
        .bind(&new_recipe.title)
        .bind(&new_recipe.description)
        .bind(&new_recipe.ingredients)
        .bind(&new_recipe.instructions)
        .bind(&new_recipe.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create recipe: {:?}", e);
            AppError::from(e)
        })?;

        Ok(recipe)
    }

    /// All recipes owned by one user, newest first.
    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Recipe>, AppError> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, description, ingredients, instructions, image_url, created_at
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }

    /// Plain lookup, no ownership filter: any authenticated caller may read
    /// any recipe.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, AppError> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, user_id, title, description, ingredients, instructions, image_url, created_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(recipe)
    }
}
