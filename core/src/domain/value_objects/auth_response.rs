//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{User, UserRole, UserStatus};

/// Client-safe user summary included in authentication responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    /// User identifier
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Username
    pub username: String,

    /// Role within the gym
    pub role: UserRole,

    /// Account status
    pub status: UserStatus,

    /// Whether the email has been verified
    pub is_email_verified: bool,

    /// Avatar URL if set
    pub avatar_url: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            status: user.status,
            is_email_verified: user.is_email_verified,
            avatar_url: user.profile.avatar_url.clone(),
        }
    }
}

/// Authentication response containing tokens and user metadata
///
/// Returned after a successful login, registration confirmation or refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// JWT refresh token for obtaining new access tokens
    pub refresh_token: String,

    /// Scheme clients present the access token with
    pub token_type: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,

    /// The authenticated user
    pub user: UserSummary,
}

impl AuthResponse {
    /// Creates an authentication response from a token pair and a user
    pub fn from_token_pair(token_pair: TokenPair, user: &User) -> Self {
        Self {
            access_token: token_pair.access_token,
            refresh_token: token_pair.refresh_token,
            token_type: token_pair.token_type,
            expires_in: token_pair.access_expires_in,
            user: UserSummary::from(user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_pair() {
        let user = User::new(
            "member@gym.com".to_string(),
            "bob".to_string(),
            "hash".to_string(),
            UserRole::Member,
        );
        let pair = TokenPair::new("acc".into(), "ref".into(), 900, 604800);

        let response = AuthResponse::from_token_pair(pair, &user);

        assert_eq!(response.access_token, "acc");
        assert_eq!(response.expires_in, 900);
        assert_eq!(response.user.email, "member@gym.com");
        assert_eq!(response.user.role, UserRole::Member);
    }

    #[test]
    fn test_summary_has_no_password() {
        let user = User::new(
            "a@b.com".to_string(),
            "bob".to_string(),
            "secret-hash".to_string(),
            UserRole::Member,
        );
        let json = serde_json::to_string(&UserSummary::from(&user)).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password"));
    }
}
