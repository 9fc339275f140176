//! Own-profile handlers

use actix_web::{web, HttpResponse};
use validator::Validate;

use sgms_core::repositories::{OtpRepository, UserRepository};
use sgms_shared::types::ApiResponse;

use crate::cookies::clear_cookies;
use crate::dto::user::{UpdateProfileRequest, UserResponse};
use crate::error::{validation_failure, ApiError};
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for GET /api/v1/users/me
pub async fn get_me<U, O>(
    context: AuthContext,
    state: web::Data<AppState<U, O>>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    let user = state.user_service.get_profile(context.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Profile retrieved",
        UserResponse::from(&user),
    )))
}

/// Handler for PATCH /api/v1/users/me
pub async fn update_me<U, O>(
    context: AuthContext,
    state: web::Data<AppState<U, O>>,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return Ok(validation_failure(errors));
    }

    let user = state
        .user_service
        .update_profile(context.user_id, request.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Profile updated",
        UserResponse::from(&user),
    )))
}

/// Handler for DELETE /api/v1/users/me
///
/// Deactivates the account (soft delete) and clears the token cookies.
/// Outstanding tokens become useless at the next refresh.
pub async fn deactivate_me<U, O>(
    context: AuthContext,
    state: web::Data<AppState<U, O>>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    state.user_service.deactivate(context.user_id).await?;

    let mut response = HttpResponse::Ok();
    for cookie in clear_cookies(&state.config.auth.cookie) {
        response.cookie(cookie);
    }
    Ok(response.json(ApiResponse::message("Account deactivated")))
}
