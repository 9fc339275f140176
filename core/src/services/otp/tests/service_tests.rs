use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entities::otp::{OtpPurpose, MAX_ATTEMPTS};
use crate::errors::{AuthError, DomainError, OtpError};
use crate::repositories::otp::MockOtpRepository;
use crate::services::otp::{EmailSender, OtpService, OtpServiceConfig};

use super::mocks::RecordingEmailSender;

fn setup() -> (
    OtpService<MockOtpRepository>,
    Arc<MockOtpRepository>,
    Arc<RecordingEmailSender>,
) {
    let repository = Arc::new(MockOtpRepository::new());
    let email = Arc::new(RecordingEmailSender::new());
    let email_dyn: Arc<dyn EmailSender> = email.clone();
    let service = OtpService::new(
        Arc::clone(&repository),
        email_dyn,
        OtpServiceConfig::default(),
    );
    (service, repository, email)
}

fn payload() -> serde_json::Value {
    serde_json::json!({"username": "bob"})
}

#[tokio::test]
async fn test_create_sends_email_with_code() {
    let (service, repository, email) = setup();

    let created = service
        .create("a@x.com", OtpPurpose::Registration, Some(payload()), Some("Bob"))
        .await
        .unwrap();

    let sent = email.last().await.expect("an email was sent");
    let stored = repository.get(created.otp_id).await.unwrap();
    assert_eq!(sent.code, stored.code);
    assert_eq!(sent.email, "a@x.com");
    assert!(created.expires_at > Utc::now());
}

#[tokio::test]
async fn test_verify_success_exactly_once() {
    let (service, repository, _email) = setup();

    let created = service
        .create("a@x.com", OtpPurpose::Registration, Some(payload()), None)
        .await
        .unwrap();
    let code = repository.get(created.otp_id).await.unwrap().code;

    let released = service
        .verify("a@x.com", &code, OtpPurpose::Registration)
        .await
        .unwrap();
    assert_eq!(released, Some(payload()));

    // Single-use: the same code must not verify twice
    let err = service
        .verify("a@x.com", &code, OtpPurpose::Registration)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::OtpAlreadyUsed)));
}

#[tokio::test]
async fn test_verify_wrong_code_counts_attempt() {
    let (service, repository, _email) = setup();

    let created = service
        .create("a@x.com", OtpPurpose::Registration, Some(payload()), None)
        .await
        .unwrap();
    let right_code = repository.get(created.otp_id).await.unwrap().code;
    let wrong_code = if right_code == "000000" { "000001" } else { "000000" };

    let err = service
        .verify("a@x.com", wrong_code, OtpPurpose::Registration)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Otp(OtpError::InvalidOtp { remaining }) if remaining == MAX_ATTEMPTS - 1
    ));
    assert_eq!(repository.get(created.otp_id).await.unwrap().attempts, 1);

    // The right code still works afterwards
    let released = service
        .verify("a@x.com", &right_code, OtpPurpose::Registration)
        .await
        .unwrap();
    assert_eq!(released, Some(payload()));
}

#[tokio::test]
async fn test_verify_fails_after_max_attempts_even_with_right_code() {
    let (service, repository, _email) = setup();

    let created = service
        .create("a@x.com", OtpPurpose::Registration, None, None)
        .await
        .unwrap();
    let right_code = repository.get(created.otp_id).await.unwrap().code;
    let wrong_code = if right_code == "000000" { "000001" } else { "000000" };

    for _ in 0..MAX_ATTEMPTS {
        let _ = service
            .verify("a@x.com", wrong_code, OtpPurpose::Registration)
            .await;
    }

    let err = service
        .verify("a@x.com", &right_code, OtpPurpose::Registration)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::OtpMaxAttempts)));
}

#[tokio::test]
async fn test_verify_expired_code_fails() {
    let (service, repository, _email) = setup();

    let created = service
        .create("a@x.com", OtpPurpose::Registration, None, None)
        .await
        .unwrap();
    let code = repository.get(created.otp_id).await.unwrap().code;

    repository
        .mutate(created.otp_id, |r| {
            r.expires_at = Utc::now() - Duration::seconds(1);
        })
        .await;

    let err = service
        .verify("a@x.com", &code, OtpPurpose::Registration)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::OtpExpired)));
}

#[tokio::test]
async fn test_verify_rejects_bad_format_without_lookup() {
    let (service, _repository, _email) = setup();

    for bad in ["12345", "1234567", "12345a", ""] {
        let err = service
            .verify("a@x.com", bad, OtpPurpose::Registration)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Otp(OtpError::InvalidOtpFormat)));
    }
}

#[tokio::test]
async fn test_verify_unknown_email_fails_not_found() {
    let (service, _repository, _email) = setup();

    let err = service
        .verify("nobody@x.com", "123456", OtpPurpose::Registration)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::OtpNotFound)));
}

#[tokio::test]
async fn test_purposes_are_isolated() {
    let (service, repository, _email) = setup();

    let created = service
        .create("a@x.com", OtpPurpose::Registration, None, None)
        .await
        .unwrap();
    let code = repository.get(created.otp_id).await.unwrap().code;

    // A registration code cannot authorize a password reset
    let err = service
        .verify("a@x.com", &code, OtpPurpose::PasswordReset)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::OtpNotFound)));
}

#[tokio::test]
async fn test_create_caps_active_codes() {
    let (service, _repository, _email) = setup();

    for _ in 0..3 {
        service
            .create("a@x.com", OtpPurpose::Registration, None, None)
            .await
            .unwrap();
    }

    let err = service
        .create("a@x.com", OtpPurpose::Registration, None, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Otp(OtpError::TooManyActiveCodes)
    ));

    // Another purpose is unaffected by the cap
    service
        .create("a@x.com", OtpPurpose::PasswordReset, None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_resend_cooldown_and_code_rotation() {
    let (service, repository, email) = setup();

    let created = service
        .create("a@x.com", OtpPurpose::Registration, Some(payload()), None)
        .await
        .unwrap();
    let first_code = repository.get(created.otp_id).await.unwrap().code;

    // Inside the 60s window the resend is refused
    let err = service
        .resend("a@x.com", OtpPurpose::Registration, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Otp(OtpError::ResendCooldown { seconds }) if seconds > 0
    ));

    // Back-date the send to get past the cooldown
    repository
        .mutate(created.otp_id, |r| {
            r.created_at = Utc::now() - Duration::seconds(61);
        })
        .await;

    service
        .resend("a@x.com", OtpPurpose::Registration, None)
        .await
        .unwrap();
    assert_eq!(email.count().await, 2);

    let record = repository.get(created.otp_id).await.unwrap();
    assert_ne!(record.code, first_code);
    assert_eq!(record.attempts, 0);
    // Payload survives the resend
    assert_eq!(record.payload, Some(payload()));

    // The previous code value no longer verifies
    let err = service
        .verify("a@x.com", &first_code, OtpPurpose::Registration)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::InvalidOtp { .. })));
}

#[tokio::test]
async fn test_resend_without_live_code_fails() {
    let (service, _repository, _email) = setup();

    let err = service
        .resend("a@x.com", OtpPurpose::Registration, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::OtpNotFound)));
}

#[tokio::test]
async fn test_email_failure_surfaces_as_delivery_error() {
    let (service, _repository, email) = setup();

    email.fail_next_sends(true);
    let err = service
        .create("a@x.com", OtpPurpose::Registration, None, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::EmailDeliveryFailure)
    ));
}

#[tokio::test]
async fn test_full_registration_scenario() {
    // create -> wrong code (attempts=1) -> right code (payload, used)
    // -> right code again (already used)
    let (service, repository, _email) = setup();

    let created = service
        .create(
            "a@x.com",
            OtpPurpose::Registration,
            Some(serde_json::json!({"username": "bob"})),
            None,
        )
        .await
        .unwrap();
    let code = repository.get(created.otp_id).await.unwrap().code;
    let wrong = if code == "999999" { "999998" } else { "999999" };

    assert!(service
        .verify("a@x.com", wrong, OtpPurpose::Registration)
        .await
        .is_err());
    assert_eq!(repository.get(created.otp_id).await.unwrap().attempts, 1);

    let released = service
        .verify("a@x.com", &code, OtpPurpose::Registration)
        .await
        .unwrap();
    assert_eq!(released, Some(serde_json::json!({"username": "bob"})));
    assert!(repository.get(created.otp_id).await.unwrap().is_used);

    let err = service
        .verify("a@x.com", &code, OtpPurpose::Registration)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::OtpAlreadyUsed)));
}
