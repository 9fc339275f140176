//! Login handler

use actix_web::{web, HttpResponse};
use validator::Validate;

use sgms_core::repositories::{OtpRepository, UserRepository};
use sgms_shared::types::ApiResponse;

use crate::cookies::cookies_for_auth;
use crate::dto::auth::LoginRequest;
use crate::error::{validation_failure, ApiError};
use crate::state::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Authenticates with email/password and returns a token pair in the body
/// plus the token cookies.
pub async fn login<U, O>(
    state: web::Data<AppState<U, O>>,
    request: web::Json<LoginRequest>,
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
        .login(&request.email, &request.password)
        .await?;

    let mut response = HttpResponse::Ok();
    for cookie in cookies_for_auth(
        &state.config.auth.cookie,
        &auth,
        state.config.auth.jwt.refresh_token_expiry,
    ) {
        response.cookie(cookie);
    }
    Ok(response.json(ApiResponse::success("Login successful", auth)))
}
