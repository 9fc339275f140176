use super::*;

use crate::domain::entities::token::TokenKind;
use crate::domain::entities::user::{User, UserRole};
use crate::errors::{DomainError, TokenError};

fn sample_user() -> User {
    User::new(
        "member@gym.com".to_string(),
        "bob_42".to_string(),
        "$2b$12$hash".to_string(),
        UserRole::Trainer,
    )
}

fn service() -> TokenService {
    TokenService::new(TokenServiceConfig::default())
}

#[test]
fn test_issue_and_verify_round_trip() {
    let service = service();
    let user = sample_user();

    let pair = service.issue_pair(&user).unwrap();
    assert_eq!(pair.token_type, "Bearer");
    assert_ne!(pair.access_token, pair.refresh_token);

    let claims = service.verify(&pair.access_token, TokenKind::Access).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.email, user.email);
    assert_eq!(claims.role, UserRole::Trainer);
    assert_eq!(claims.iss, "sgms-backend");

    let refresh_claims = service.verify(&pair.refresh_token, TokenKind::Refresh).unwrap();
    assert_eq!(refresh_claims.token_type, TokenKind::Refresh);
}

#[test]
fn test_wrong_token_type_rejected() {
    let service = service();
    let pair = service.issue_pair(&sample_user()).unwrap();

    // A refresh token cannot be presented as an access token, and vice versa
    let err = service.verify(&pair.refresh_token, TokenKind::Access).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::WrongTokenType { .. })
    ));

    let err = service.verify(&pair.access_token, TokenKind::Refresh).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::WrongTokenType { .. })
    ));
}

#[test]
fn test_expired_token_rejected() {
    // Negative expiry well past the default validation leeway
    let config = TokenServiceConfig {
        access_token_expiry_secs: -120,
        ..TokenServiceConfig::default()
    };
    let service = TokenService::new(config);
    let pair = service.issue_pair(&sample_user()).unwrap();

    let err = service.verify(&pair.access_token, TokenKind::Access).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::TokenExpired)));
}

#[test]
fn test_tampered_signature_rejected() {
    let service = service();
    let other = TokenService::new(TokenServiceConfig {
        jwt_secret: "a-completely-different-secret".to_string(),
        ..TokenServiceConfig::default()
    });

    let pair = other.issue_pair(&sample_user()).unwrap();
    let err = service.verify(&pair.access_token, TokenKind::Access).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidSignature)
    ));
}

#[test]
fn test_malformed_token_rejected() {
    let service = service();
    let err = service.verify("definitely-not-a-jwt", TokenKind::Access).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::MalformedToken)
    ));
}

#[test]
fn test_wrong_audience_rejected() {
    let issuing = TokenService::new(TokenServiceConfig {
        audience: "another-frontend".to_string(),
        ..TokenServiceConfig::default()
    });
    let pair = issuing.issue_pair(&sample_user()).unwrap();

    let err = service().verify(&pair.access_token, TokenKind::Access).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidClaims)));
}

#[test]
fn test_refresh_reissues_pair_for_subject() {
    let service = service();
    let user = sample_user();
    let pair = service.issue_pair(&user).unwrap();

    let new_pair = service.refresh(&pair.refresh_token, &user).unwrap();
    let claims = service.verify(&new_pair.access_token, TokenKind::Access).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);

    // Without rotation the old refresh token still verifies
    assert!(service.verify(&pair.refresh_token, TokenKind::Refresh).is_ok());
}

#[test]
fn test_refresh_rejects_subject_mismatch() {
    let service = service();
    let user = sample_user();
    let pair = service.issue_pair(&user).unwrap();

    let other_user = User::new(
        "other@gym.com".to_string(),
        "alice".to_string(),
        "hash".to_string(),
        UserRole::Member,
    );
    let err = service.refresh(&pair.refresh_token, &other_user).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidClaims)));
}

#[test]
fn test_refresh_rejects_access_token() {
    let service = service();
    let user = sample_user();
    let pair = service.issue_pair(&user).unwrap();

    let err = service.refresh(&pair.access_token, &user).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::WrongTokenType { .. })
    ));
}
