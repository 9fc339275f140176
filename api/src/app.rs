//! Application factory
//!
//! Builds the Actix application: middleware stack (tracing, CORS, per-IP
//! rate limits), the auth and user scopes, health check and the 404
//! fallback.

use std::sync::Arc;

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use sgms_core::repositories::{OtpRepository, UserRepository};
use sgms_shared::types::{ApiResponse, ErrorBody};

use crate::middleware::{auth::JwtAuth, cors::create_cors, rate_limit::RateLimiter};
use crate::routes::{auth, users};
use crate::state::AppState;

/// Create and configure the application with all dependencies
pub fn create_app<U, O>(
    app_state: web::Data<AppState<U, O>>,
    redis_client: Arc<redis::Client>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    O: OtpRepository + 'static,
{
    let config = &app_state.config;

    let cors = create_cors(&config.cors);
    let api_limiter = RateLimiter::new(
        Arc::clone(&redis_client),
        "api",
        config.rate_limit.api_requests_per_ip,
        config.rate_limit.api_window_seconds,
    );
    let auth_limiter = RateLimiter::new(
        redis_client,
        "auth",
        config.rate_limit.auth_requests_per_ip,
        config.rate_limit.auth_window_seconds,
    );

    // Bearer header always works; the cookie fallback only when enabled
    let mut jwt = JwtAuth::new(Arc::clone(&app_state.token_service));
    if config.auth.cookie.store_access_token {
        jwt = jwt.with_cookie(config.auth.cookie.access_cookie_name.clone());
    }

    App::new()
        .app_data(app_state.clone())
        .wrap(TracingLogger::default())
        .wrap(cors)
        .wrap(api_limiter)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .wrap(auth_limiter)
                        .route("/register", web::post().to(auth::register::<U, O>))
                        .route(
                            "/register/confirm",
                            web::post().to(auth::confirm_registration::<U, O>),
                        )
                        .route(
                            "/register/resend",
                            web::post().to(auth::resend_registration_code::<U, O>),
                        )
                        .route("/login", web::post().to(auth::login::<U, O>))
                        .route("/refresh", web::post().to(auth::refresh::<U, O>))
                        .route(
                            "/logout",
                            web::post().to(auth::logout::<U, O>).wrap(jwt.clone()),
                        )
                        .route(
                            "/password/forgot",
                            web::post().to(auth::forgot_password::<U, O>),
                        )
                        .route(
                            "/password/reset",
                            web::post().to(auth::reset_password::<U, O>),
                        ),
                )
                .service(
                    web::scope("/users")
                        .wrap(jwt)
                        .route("", web::get().to(users::list_users::<U, O>))
                        .route("/me", web::get().to(users::get_me::<U, O>))
                        .route("/me", web::patch().to(users::update_me::<U, O>))
                        .route("/me", web::delete().to(users::deactivate_me::<U, O>))
                        .route("/me/avatar", web::put().to(users::upload_avatar::<U, O>))
                        .route(
                            "/me/avatar",
                            web::delete().to(users::remove_avatar::<U, O>),
                        )
                        .route("/{id}", web::get().to(users::get_user::<U, O>))
                        .route("/{id}", web::patch().to(users::admin_update_user::<U, O>))
                        .route("/{id}", web::delete().to(users::delete_user::<U, O>)),
                ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "sgms-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Fallback for unmatched routes
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::error(
        "Resource not found",
        ErrorBody::new("NOT_FOUND"),
    ))
}
