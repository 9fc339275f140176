//! Registration handlers: start, confirm, resend

use actix_web::{web, HttpResponse};
use validator::Validate;

use sgms_core::repositories::{OtpRepository, UserRepository};
use sgms_core::services::auth::RegistrationRequest;
use sgms_shared::types::ApiResponse;

use crate::cookies::cookies_for_auth;
use crate::dto::auth::{
    ConfirmRegistrationRequest, OtpIssuedResponse, RegisterRequest, ResendOtpRequest,
};
use crate::error::{validation_failure, ApiError};
use crate::state::AppState;

/// Handler for POST /api/v1/auth/register
///
/// Stages the account and emails a confirmation code; no account exists
/// until the code is confirmed.
pub async fn register<U, O>(
    state: web::Data<AppState<U, O>>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return Ok(validation_failure(errors));
    }
    let request = request.into_inner();

    let created = state
        .auth_service
        .register(RegistrationRequest {
            email: request.email,
            username: request.username,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Verification code sent to your email",
        OtpIssuedResponse {
            expires_at: created.expires_at,
            resend_available_at: created.resend_available_at,
        },
    )))
}

/// Handler for POST /api/v1/auth/register/confirm
///
/// Verifies the emailed code, creates the account and signs the user in
/// (tokens in the body plus cookies).
pub async fn confirm_registration<U, O>(
    state: web::Data<AppState<U, O>>,
    request: web::Json<ConfirmRegistrationRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return Ok(validation_failure(errors));
    }

    let auth = state
        .auth_service
        .confirm_registration(&request.email, &request.code)
        .await?;

    let mut response = HttpResponse::Created();
    for cookie in cookies_for_auth(
        &state.config.auth.cookie,
        &auth,
        state.config.auth.jwt.refresh_token_expiry,
    ) {
        response.cookie(cookie);
    }
    Ok(response.json(ApiResponse::success("Registration successful", auth)))
}

/// Handler for POST /api/v1/auth/register/resend
pub async fn resend_registration_code<U, O>(
    state: web::Data<AppState<U, O>>,
    request: web::Json<ResendOtpRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return Ok(validation_failure(errors));
    }

    let created = state
        .auth_service
        .resend_registration_code(&request.email)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Verification code resent",
        OtpIssuedResponse {
            expires_at: created.expires_at,
            resend_available_at: created.resend_available_at,
        },
    )))
}
