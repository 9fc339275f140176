//! Main token service implementation

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{Claims, TokenKind, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Service for issuing and verifying JWT access/refresh token pairs
///
/// Purely computational: signing and verification happen in memory against
/// the configured secret; no storage round-trips are involved.
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    pub fn new(config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Generates a new token pair (access + refresh) for a user
    ///
    /// Claims carry the user id, email and role so authorization checks can
    /// run without a database round-trip.
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, DomainError> {
        let access_token = self.encode_for(user, TokenKind::Access)?;
        let refresh_token = self.encode_for(user, TokenKind::Refresh)?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_expiry_secs,
            self.config.refresh_token_expiry_secs,
        ))
    }

    /// Verifies a token and returns its claims
    ///
    /// Checks signature, expiry, not-before, issuer and audience, then the
    /// token kind. Failure reasons stay distinct for diagnostics; the API
    /// boundary collapses them all into 401 responses.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, DomainError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                let token_error = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                        TokenError::InvalidClaims
                    }
                    _ => TokenError::MalformedToken,
                };
                DomainError::Token(token_error)
            })?;

        let claims = token_data.claims;
        if claims.token_type != expected {
            return Err(DomainError::Token(TokenError::WrongTokenType {
                expected: expected.as_str().to_string(),
            }));
        }

        Ok(claims)
    }

    /// Re-issues a token pair from a valid refresh token
    ///
    /// The caller is expected to have reloaded the user from storage so the
    /// new access token reflects the current role and status. Note that the
    /// presented refresh token is NOT invalidated here; it remains usable
    /// until its own expiry (no rotation).
    pub fn refresh(&self, refresh_token: &str, user: &User) -> Result<TokenPair, DomainError> {
        let claims = self.verify(refresh_token, TokenKind::Refresh)?;

        let subject = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidClaims))?;
        if subject != user.id {
            return Err(DomainError::Token(TokenError::InvalidClaims));
        }

        self.issue_pair(user)
    }

    fn encode_for(&self, user: &User, kind: TokenKind) -> Result<String, DomainError> {
        let ttl = match kind {
            TokenKind::Access => self.config.access_token_expiry_secs,
            TokenKind::Refresh => self.config.refresh_token_expiry_secs,
        };

        let claims = Claims::new(
            user.id,
            user.email.clone(),
            user.role,
            kind,
            ttl,
            &self.config.issuer,
            &self.config.audience,
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }
}
