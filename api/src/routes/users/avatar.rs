//! Avatar upload/removal handlers

use actix_web::{web, HttpResponse};
use base64::Engine;
use validator::Validate;

use sgms_core::errors::{DomainError, ValidationError};
use sgms_core::repositories::{OtpRepository, UserRepository};
use sgms_shared::types::ApiResponse;

use crate::dto::user::{AvatarUploadRequest, UserResponse};
use crate::error::{validation_failure, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Maximum decoded avatar size (10 MB)
const MAX_AVATAR_BYTES: usize = 10 * 1024 * 1024;

/// Handler for PUT /api/v1/users/me/avatar
///
/// Accepts a base64-encoded image, pushes it to the image host and stores
/// the returned URL. A previously stored avatar is deleted at the host
/// best-effort.
pub async fn upload_avatar<U, O>(
    context: AuthContext,
    state: web::Data<AppState<U, O>>,
    request: web::Json<AvatarUploadRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return Ok(validation_failure(errors));
    }

    if !request.content_type.starts_with("image/") {
        return Err(DomainError::Validation(ValidationError::InvalidFormat {
            field: "content_type".to_string(),
        })
        .into());
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(request.data.as_bytes())
        .map_err(|_| {
            DomainError::Validation(ValidationError::InvalidFormat {
                field: "data".to_string(),
            })
        })?;

    if bytes.is_empty() || bytes.len() > MAX_AVATAR_BYTES {
        return Err(DomainError::Validation(ValidationError::InvalidLength {
            field: "data".to_string(),
            max: MAX_AVATAR_BYTES,
        })
        .into());
    }

    let user = state
        .user_service
        .set_avatar(context.user_id, &bytes, &request.content_type)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Avatar updated",
        UserResponse::from(&user),
    )))
}

/// Handler for DELETE /api/v1/users/me/avatar
pub async fn remove_avatar<U, O>(
    context: AuthContext,
    state: web::Data<AppState<U, O>>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    let user = state.user_service.remove_avatar(context.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Avatar removed",
        UserResponse::from(&user),
    )))
}
