//! Password reset handlers

use actix_web::{web, HttpResponse};
use validator::Validate;

use sgms_core::repositories::{OtpRepository, UserRepository};
use sgms_shared::types::ApiResponse;

use crate::dto::auth::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::error::{validation_failure, ApiError};
use crate::state::AppState;

/// Handler for POST /api/v1/auth/password/forgot
///
/// Always answers success; whether the address belongs to an account is
/// never revealed.
pub async fn forgot_password<U, O>(
    state: web::Data<AppState<U, O>>,
    request: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return Ok(validation_failure(errors));
    }

    state
        .auth_service
        .request_password_reset(&request.email)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(
        "If the email is registered, a reset code has been sent",
    )))
}

/// Handler for POST /api/v1/auth/password/reset
pub async fn reset_password<U, O>(
    state: web::Data<AppState<U, O>>,
    request: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return Ok(validation_failure(errors));
    }

    state
        .auth_service
        .reset_password(&request.email, &request.code, &request.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Password reset successful")))
}
