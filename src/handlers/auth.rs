// src/handlers/auth.rs

use axum::{
    Extension, Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    handlers::forms::FormData,
    models::user::{LoginRequest, NewUser, RegisterRequest},
    storage::ImageStore,
    store::UserStore,
    utils::{
        hash::{hash_password, verify_password},
        jwt::{Claims, sign_jwt},
    },
};

/// Registers a new user from a multipart form (text fields plus an optional
/// profile image).
///
/// The profile image, when present, is relayed to blob storage before the
/// user row is written: an upload failure fails the whole request, and no
/// row ever references a URL that was not issued.
pub async fn register(
    State(users): State<UserStore>,
    State(images): State<Option<ImageStore>>,
    State(config): State<Config>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = FormData::read(&mut multipart).await?;

    let payload = RegisterRequest {
        username: form.require("username")?,
        email: form.require("email")?,
        password: form.require("password")?,
        confirm_password: form.require("confirmPassword")?,
    };

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    // Friendly duplicate check. The database constraints remain the actual
    // enforcement point against a concurrent registration.
    if users
        .find_by_username_or_email(&payload.username, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Username or email already in use".to_string(),
        ));
    }

    let hashed_password = hash_password(&payload.password)?;

    // Upload before insert, never the other way around.
    let profile_image = match form.image {
        Some(image) => {
            let relay = images.ok_or_else(|| {
                AppError::InternalServerError("Image storage is not configured".to_string())
            })?;
            Some(
                relay
                    .store(
                        "profile-images",
                        &image.file_name,
                        &image.content_type,
                        image.data,
                    )
                    .await?,
            )
        }
        None => None,
    };

    let user = users
        .create(NewUser {
            username: payload.username,
            email: payload.email,
            password_hash: hashed_password,
            profile_image,
        })
        .await?;

    let token = sign_jwt(
        user.id,
        &user.username,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    tracing::info!("New user registered: {} (id {})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "token": token,
            "user": user,
        })),
    ))
}

/// Authenticates a user and returns a JWT token.
///
/// Verifies the username and password against the database.
/// If valid, signs a JWT token with the user's ID and username.
pub async fn login(
    State(users): State<UserStore>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = users
        .find_by_username(&payload.username)
        .await?
        .ok_or(AppError::BadRequest("User not found".to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password)?;

    if !is_valid {
        return Err(AppError::BadRequest("Invalid password".to_string()));
    }

    let token = sign_jwt(
        user.id,
        &user.username,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    tracing::info!("Login successful for user: {}", user.username);

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        // The password hash is serde-skipped on the row model.
        "user": user,
    })))
}

/// Echoes the identity carried by a token the middleware already verified.
pub async fn verify_token(
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({
        "message": "Token is valid",
        "user": {
            "id": claims.user_id(),
            "username": claims.username,
        },
    })))
}
