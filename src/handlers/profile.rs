use axum::{
    Extension, Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::forms::FormData,
    models::user::UpdateProfileRequest,
    storage::ImageStore,
    store::UserStore,
    utils::jwt::Claims,
};

/// Get the current user's profile.
///
/// 404 is possible when a valid token outlives its user row.
pub async fn get_profile(
    State(users): State<UserStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = users
        .find_by_id(claims.user_id())
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Update username, email and optionally the profile image.
///
/// When no new image is supplied the existing URL is preserved. A supplied
/// image is uploaded before the row is touched.
pub async fn update_profile(
    State(users): State<UserStore>,
    State(images): State<Option<ImageStore>>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();
    let form = FormData::read(&mut multipart).await?;

    let payload = UpdateProfileRequest {
        username: form.require("username")?,
        email: form.require("email")?,
    };

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    // Collision check against *other* users only; keeping your own
    // username/email untouched is always allowed.
    if users
        .is_taken_by_other(user_id, &payload.username, &payload.email)
        .await?
    {
        return Err(AppError::Conflict(
            "Username or email already in use by another user".to_string(),
        ));
    }

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
        .update(user_id, &payload.username, &payload.email, profile_image)
        .await?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": user,
    })))
}
