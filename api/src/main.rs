//! SGMS API server binary
//!
//! Wires the environment-driven configuration, database pool, external
//! collaborators and domain services together, then serves the Actix
//! application.

use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use sgms_api::{app::create_app, state::AppState};
use sgms_core::services::auth::{AuthService, AuthServiceConfig};
use sgms_core::services::otp::{OtpService, OtpServiceConfig};
use sgms_core::services::token::{TokenService, TokenServiceConfig};
use sgms_core::services::users::UserService;
use sgms_infra::database::{create_pool, MySqlOtpRepository, MySqlUserRepository};
use sgms_infra::email::create_email_sender;
use sgms_infra::media::create_image_host;
use sgms_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env();

    // Initialize tracing (RUST_LOG wins over the configured default)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.logging.ansi)
        .init();

    tracing::info!(environment = %config.environment, "starting SGMS API server");
    if config.auth.jwt.is_using_default_secret() && config.environment.is_production() {
        anyhow::bail!("JWT_SECRET must be set in production");
    }

    // Database and repositories
    let pool = create_pool(&config.database)
        .await
        .context("database pool initialization failed")?;
    let user_repository = Arc::new(MySqlUserRepository::new(pool.clone()));
    let otp_repository = Arc::new(MySqlOtpRepository::new(pool));

    // External collaborators
    let email_sender =
        create_email_sender(&config.email).context("email sender initialization failed")?;
    let image_host =
        create_image_host(&config.image_host).context("image host initialization failed")?;

    // Domain services
    let otp_service = Arc::new(OtpService::new(
        otp_repository,
        email_sender,
        OtpServiceConfig {
            resend_cooldown_seconds: config.rate_limit.otp_resend_cooldown_seconds,
            ..OtpServiceConfig::default()
        },
    ));
    let token_service = Arc::new(TokenService::new(TokenServiceConfig::from(&config.auth.jwt)));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        otp_service,
        Arc::clone(&token_service),
        AuthServiceConfig::default(),
    ));
    let user_service = Arc::new(UserService::new(user_repository, image_host));

    // Rate limiting backend
    let redis_client = Arc::new(
        redis::Client::open(config.rate_limit.redis_url.clone())
            .context("invalid Redis URL")?,
    );

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let state = web::Data::new(AppState::new(
        auth_service,
        user_service,
        token_service,
        config,
    ));

    tracing::info!(bind_address, "server listening");

    let mut server = HttpServer::new(move || create_app(state.clone(), Arc::clone(&redis_client)));
    if workers > 0 {
        server = server.workers(workers);
    }
    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {bind_address}"))?
        .run()
        .await?;

    Ok(())
}
