//! Credential store: single-row reads and writes against the users relation.

use sqlx::PgPool;

use crate::{
    error::{AppError, is_unique_violation},
    models::user::{NewUser, User, UserProfile},
};

/// Data access for user accounts.
///
/// The username/email pre-checks here are advisory: they produce the friendly
/// error on the common path, but the database unique constraints are the
/// actual enforcement point under concurrent registration.
#[derive(Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Uniqueness pre-check used before registration. No side effect.
    pub async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<UserProfile>, AppError> {
        let user = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, username, email, profile_image, created_at
            FROM users
            WHERE username = $1 OR email = $2
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a new user. The id and creation timestamp are assigned by the
    /// database; the returned profile never includes the credential hash.
    pub async fn create(&self, new_user: NewUser) -> Result<UserProfile, AppError> {
        let user = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO users (username, email, password, profile_image)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, profile_image, created_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.profile_image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Username or email already in use".to_string())
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::from(e)
            }
        })?;

        Ok(user)
    }

    /// Lookup for login. The returned row carries the credential hash for
    /// verification by the caller, which must not re-expose it.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, profile_image, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Profile lookup by id. Hashless projection.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserProfile>, AppError> {
        let user = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, username, email, profile_image, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// True when another user (a different id) already holds the username or
    /// email. Used as the profile-update pre-check.
    pub async fn is_taken_by_other(
        &self,
        id: i64,
        username: &str,
        email: &str,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE (username = $1 OR email = $2) AND id != $3
            )
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    /// Updates username, email and (optionally) the profile image URL.
    /// When no new image URL is supplied the existing one is preserved.
    pub async fn update(
        &self,
        id: i64,
        username: &str,
        email: &str,
        profile_image: Option<String>,
    ) -> Result<UserProfile, AppError> {
        let user = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE users
            SET username = $1,
                email = $2,
                profile_image = COALESCE($3, profile_image)
            WHERE id = $4
            RETURNING id, username, email, profile_image, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(&profile_image)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Username or email already in use".to_string())
            } else {
                tracing::error!("Failed to update user {}: {:?}", id, e);
                AppError::from(e)
            }
        })?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

        Ok(user)
    }
}
