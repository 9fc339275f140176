//! Token refresh handler

use actix_web::{web, HttpRequest, HttpResponse};

use sgms_core::errors::{DomainError, TokenError};
use sgms_core::repositories::{OtpRepository, UserRepository};
use sgms_shared::types::ApiResponse;

use crate::cookies::{cookies_for_auth, refresh_token_from};
use crate::dto::auth::RefreshRequest;
use crate::error::ApiError;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Accepts the refresh token from the request body or the refresh cookie
/// (body wins) and answers with a fresh pair. The presented token is not
/// invalidated; it expires on its own schedule.
pub async fn refresh<U, O>(
    req: HttpRequest,
    state: web::Data<AppState<U, O>>,
    request: Option<web::Json<RefreshRequest>>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    let body_token = request.and_then(|r| r.into_inner().refresh_token);
    let token = body_token
        .or_else(|| refresh_token_from(&req, &state.config.auth.cookie))
        .ok_or(DomainError::Token(TokenError::MalformedToken))?;

    let auth = state.auth_service.refresh(&token).await?;

    let mut response = HttpResponse::Ok();
    for cookie in cookies_for_auth(
        &state.config.auth.cookie,
        &auth,
        state.config.auth.jwt.refresh_token_expiry,
    ) {
        response.cookie(cookie);
    }
    Ok(response.json(ApiResponse::success("Token refreshed", auth)))
}
