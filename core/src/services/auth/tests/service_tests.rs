use std::sync::Arc;

use crate::domain::entities::user::{User, UserRole, UserStatus};
use crate::errors::{AuthError, DomainError, TokenError, ValidationError};
use crate::repositories::otp::MockOtpRepository;
use crate::repositories::user::MockUserRepository;
use crate::repositories::UserRepository;
use crate::services::auth::{AuthService, AuthServiceConfig, RegistrationRequest};
use crate::services::otp::{EmailSender, OtpService, OtpServiceConfig};
use crate::services::token::{TokenService, TokenServiceConfig};

use super::mocks::CapturingEmailSender;

type TestAuthService = AuthService<MockUserRepository, MockOtpRepository>;

struct Harness {
    auth: TestAuthService,
    users: Arc<MockUserRepository>,
    email: Arc<CapturingEmailSender>,
}

fn setup() -> Harness {
    let users = Arc::new(MockUserRepository::new());
    let otps = Arc::new(MockOtpRepository::new());
    let email = Arc::new(CapturingEmailSender::new());

    let email_dyn: Arc<dyn EmailSender> = email.clone();
    let otp_service = Arc::new(OtpService::new(
        Arc::clone(&otps),
        email_dyn,
        OtpServiceConfig::default(),
    ));
    let token_service = Arc::new(TokenService::new(TokenServiceConfig::default()));

    // Low bcrypt cost keeps the suite fast; production uses 12
    let config = AuthServiceConfig {
        bcrypt_cost: 4,
        ..AuthServiceConfig::default()
    };

    Harness {
        auth: AuthService::new(users.clone(), otp_service, token_service, config),
        users,
        email,
    }
}

fn registration(email: &str, username: &str) -> RegistrationRequest {
    RegistrationRequest {
        email: email.to_string(),
        username: username.to_string(),
        password: "Sup3rSecret".to_string(),
        first_name: Some("Bob".to_string()),
        last_name: None,
        phone: None,
    }
}

async fn seed_active_user(harness: &Harness, email: &str, password: &str) -> User {
    let hash = bcrypt::hash(password, 4).unwrap();
    let user = User::new(
        email.to_string(),
        "seeded".to_string(),
        hash,
        UserRole::Member,
    );
    harness.users.insert(user.clone()).await;
    user
}

#[tokio::test]
async fn test_registration_confirmation_flow() {
    let harness = setup();

    harness
        .auth
        .register(registration("New@Gym.com", "bob_42"))
        .await
        .unwrap();

    // No account exists until the code is confirmed
    assert!(harness
        .users
        .find_by_email("new@gym.com")
        .await
        .unwrap()
        .is_none());

    let code = harness.email.last_code().await.expect("code was emailed");
    let response = harness
        .auth
        .confirm_registration("new@gym.com", &code)
        .await
        .unwrap();

    assert_eq!(response.user.email, "new@gym.com");
    assert_eq!(response.user.role, UserRole::Member);
    assert!(response.user.is_email_verified);

    // The staged password hash works for login
    let login = harness.auth.login("new@gym.com", "Sup3rSecret").await.unwrap();
    assert_eq!(login.user.username, "bob_42");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let harness = setup();
    seed_active_user(&harness, "taken@gym.com", "Sup3rSecret").await;

    let err = harness
        .auth
        .register(registration("taken@gym.com", "someone"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::EmailAlreadyExists)
    ));
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let harness = setup();
    let mut request = registration("a@gym.com", "bob");
    request.password = "weak".to_string();

    let err = harness.auth.register(request).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::WeakPassword)
    ));
}

#[tokio::test]
async fn test_login_wrong_password_locks_after_max_attempts() {
    let harness = setup();
    let user = seed_active_user(&harness, "member@gym.com", "Sup3rSecret").await;

    for _ in 0..5 {
        let err = harness.auth.login("member@gym.com", "WrongPass1").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Auth(AuthError::InvalidCredentials)
        ));
    }

    let stored = harness.users.get(user.id).await.unwrap();
    assert_eq!(stored.failed_login_attempts, 5);
    assert!(stored.is_locked());

    // Even the correct password is refused while locked
    let err = harness.auth.login("member@gym.com", "Sup3rSecret").await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::AccountLocked)));
}

#[tokio::test]
async fn test_login_success_resets_attempt_counter() {
    let harness = setup();
    let user = seed_active_user(&harness, "member@gym.com", "Sup3rSecret").await;

    for _ in 0..3 {
        let _ = harness.auth.login("member@gym.com", "WrongPass1").await;
    }
    assert_eq!(
        harness.users.get(user.id).await.unwrap().failed_login_attempts,
        3
    );

    harness.auth.login("member@gym.com", "Sup3rSecret").await.unwrap();

    let stored = harness.users.get(user.id).await.unwrap();
    assert_eq!(stored.failed_login_attempts, 0);
    assert!(stored.last_login_at.is_some());
}

#[tokio::test]
async fn test_login_gated_by_status_with_correct_credentials() {
    let harness = setup();

    let mut inactive = seed_active_user(&harness, "inactive@gym.com", "Sup3rSecret").await;
    inactive.status = UserStatus::Inactive;
    harness.users.insert(inactive).await;

    let err = harness.auth.login("inactive@gym.com", "Sup3rSecret").await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::AccountInactive)));

    let mut suspended = seed_active_user(&harness, "suspended@gym.com", "Sup3rSecret").await;
    suspended.status = UserStatus::Suspended;
    harness.users.insert(suspended).await;

    let err = harness.auth.login("suspended@gym.com", "Sup3rSecret").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::AccountSuspended)
    ));
}

#[tokio::test]
async fn test_login_unknown_email_is_invalid_credentials() {
    let harness = setup();
    let err = harness.auth.login("ghost@gym.com", "Sup3rSecret").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_refresh_returns_new_pair() {
    let harness = setup();
    seed_active_user(&harness, "member@gym.com", "Sup3rSecret").await;

    let login = harness.auth.login("member@gym.com", "Sup3rSecret").await.unwrap();
    let refreshed = harness.auth.refresh(&login.refresh_token).await.unwrap();

    assert_eq!(refreshed.user.email, "member@gym.com");
    assert!(!refreshed.access_token.is_empty());

    // The old refresh token is still accepted afterwards (no rotation)
    assert!(harness.auth.refresh(&login.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let harness = setup();
    seed_active_user(&harness, "member@gym.com", "Sup3rSecret").await;

    let login = harness.auth.login("member@gym.com", "Sup3rSecret").await.unwrap();
    let err = harness.auth.refresh(&login.access_token).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::WrongTokenType { .. })
    ));
}

#[tokio::test]
async fn test_refresh_refused_for_suspended_account() {
    let harness = setup();
    let user = seed_active_user(&harness, "member@gym.com", "Sup3rSecret").await;

    let login = harness.auth.login("member@gym.com", "Sup3rSecret").await.unwrap();

    let mut stored = harness.users.get(user.id).await.unwrap();
    stored.status = UserStatus::Suspended;
    harness.users.insert(stored).await;

    let err = harness.auth.refresh(&login.refresh_token).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::AccountSuspended)
    ));
}

#[tokio::test]
async fn test_password_reset_flow() {
    let harness = setup();
    let user = seed_active_user(&harness, "member@gym.com", "Sup3rSecret").await;

    harness
        .auth
        .request_password_reset("member@gym.com")
        .await
        .unwrap();
    let code = harness.email.last_code().await.expect("reset code emailed");

    harness
        .auth
        .reset_password("member@gym.com", &code, "N3wPassword")
        .await
        .unwrap();

    // Old password is out, new one is in
    assert!(harness.auth.login("member@gym.com", "Sup3rSecret").await.is_err());
    let login = harness.auth.login("member@gym.com", "N3wPassword").await.unwrap();
    assert_eq!(login.user.id, user.id);
}

#[tokio::test]
async fn test_password_reset_unknown_email_does_not_leak() {
    let harness = setup();

    // Succeeds silently and sends nothing
    harness
        .auth
        .request_password_reset("ghost@gym.com")
        .await
        .unwrap();
    assert!(harness.email.last_code().await.is_none());
}

#[tokio::test]
async fn test_password_reset_clears_lockout() {
    let harness = setup();
    let user = seed_active_user(&harness, "member@gym.com", "Sup3rSecret").await;

    for _ in 0..5 {
        let _ = harness.auth.login("member@gym.com", "WrongPass1").await;
    }
    assert!(harness.users.get(user.id).await.unwrap().is_locked());

    harness
        .auth
        .request_password_reset("member@gym.com")
        .await
        .unwrap();
    let code = harness.email.last_code().await.unwrap();
    harness
        .auth
        .reset_password("member@gym.com", &code, "N3wPassword")
        .await
        .unwrap();

    // Lockout is gone and the new password authenticates
    assert!(!harness.users.get(user.id).await.unwrap().is_locked());
    harness.auth.login("member@gym.com", "N3wPassword").await.unwrap();
}
