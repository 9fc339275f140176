//! Logout handler

use actix_web::{web, HttpResponse};

use sgms_core::repositories::{OtpRepository, UserRepository};
use sgms_shared::types::ApiResponse;

use crate::cookies::clear_cookies;
use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Clears the token cookies. The tokens themselves stay valid until
/// expiry (there is no revocation list), so clients must also drop any
/// copies they hold.
pub async fn logout<U, O>(
    context: AuthContext,
    state: web::Data<AppState<U, O>>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    tracing::info!(user_id = %context.user_id, "user logged out");

    let mut response = HttpResponse::Ok();
    for cookie in clear_cookies(&state.config.auth.cookie) {
        response.cookie(cookie);
    }
    Ok(response.json(ApiResponse::message("Logout successful")))
}
