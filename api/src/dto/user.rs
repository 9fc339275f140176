//! User profile request/response DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sgms_core::domain::entities::user::{User, UserRole, UserStatus};
use sgms_core::services::users::ProfileUpdate;

/// Client-facing user representation
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_email_verified: bool,
    pub profile: ProfileResponse,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields nested in [`UserResponse`]
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            status: user.status,
            is_email_verified: user.is_email_verified,
            profile: ProfileResponse {
                first_name: user.profile.first_name.clone(),
                last_name: user.profile.last_name.clone(),
                full_name: user.profile.full_name(),
                phone: user.profile.phone.clone(),
                avatar_url: user.profile.avatar_url.clone(),
                date_of_birth: user.profile.date_of_birth,
            },
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request body for PATCH /users/me
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 3, max = 30))]
    pub username: Option<String>,

    #[validate(length(max = 50))]
    pub first_name: Option<String>,

    #[validate(length(max = 50))]
    pub last_name: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    pub date_of_birth: Option<NaiveDate>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            email: request.email,
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            date_of_birth: request.date_of_birth,
        }
    }
}

/// Request body for PUT /users/me/avatar
///
/// The image rides base64-encoded in JSON; decoding and size limits are
/// enforced in the handler.
#[derive(Debug, Deserialize, Validate)]
pub struct AvatarUploadRequest {
    #[validate(length(min = 1, message = "image data is required"))]
    pub data: String,

    #[validate(length(min = 1, message = "content type is required"))]
    pub content_type: String,
}

/// Request body for PATCH /users/{id} (admin)
#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

/// Query parameters for GET /users (admin listing)
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    sgms_shared::types::pagination::DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_hides_password() {
        let user = User::new(
            "a@gym.com".to_string(),
            "bob".to_string(),
            "secret-hash".to_string(),
            UserRole::Member,
        );
        let json = serde_json::to_string(&UserResponse::from(&user)).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"role\":\"member\""));
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListUsersQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert!(query.role.is_none());
    }
}
