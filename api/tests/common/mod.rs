//! Shared harness for API integration tests
//!
//! Runs the real application factory against the in-memory repositories
//! and the mock collaborators. The Redis URL points nowhere; the rate
//! limiter fails open, which is exactly what these tests want.

use std::sync::Arc;

use actix_web::web;

use sgms_api::state::AppState;
use sgms_core::domain::entities::user::{User, UserRole};
use sgms_core::repositories::{MockOtpRepository, MockUserRepository};
use sgms_core::services::auth::{AuthService, AuthServiceConfig};
use sgms_core::services::otp::{OtpService, OtpServiceConfig};
use sgms_core::services::token::{TokenService, TokenServiceConfig};
use sgms_core::services::users::UserService;
use sgms_infra::email::MockEmailSender;
use sgms_infra::media::MockImageHost;
use sgms_shared::config::AppConfig;

pub type TestState = web::Data<AppState<MockUserRepository, MockOtpRepository>>;

pub struct TestHarness {
    pub state: TestState,
    pub users: Arc<MockUserRepository>,
    pub otps: Arc<MockOtpRepository>,
    pub redis: Arc<redis::Client>,
}

/// Build the application state over in-memory repositories
pub fn setup() -> TestHarness {
    let users = Arc::new(MockUserRepository::new());
    let otps = Arc::new(MockOtpRepository::new());

    let otp_service = Arc::new(OtpService::new(
        Arc::clone(&otps),
        Arc::new(MockEmailSender::new()),
        OtpServiceConfig::default(),
    ));
    let token_service = Arc::new(TokenService::new(TokenServiceConfig::default()));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&users),
        otp_service,
        Arc::clone(&token_service),
        AuthServiceConfig {
            bcrypt_cost: 4,
            ..AuthServiceConfig::default()
        },
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&users),
        Arc::new(MockImageHost::new()),
    ));

    let state = web::Data::new(AppState::new(
        auth_service,
        user_service,
        token_service,
        AppConfig::default(),
    ));

    // Nothing listens here; the limiter degrades to allowing everything
    let redis = Arc::new(redis::Client::open("redis://127.0.0.1:16379").unwrap());

    TestHarness {
        state,
        users,
        otps,
        redis,
    }
}

/// Seed a user with a bcrypt(4) password hash
pub async fn seed_user(harness: &TestHarness, email: &str, password: &str, role: UserRole) -> User {
    let hash = bcrypt::hash(password, 4).unwrap();
    let user = User::new(
        email.to_string(),
        email.split('@').next().unwrap().to_string(),
        hash,
        role,
    );
    harness.users.insert(user.clone()).await;
    user
}
