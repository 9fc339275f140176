//! User profile and account management implementation

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use sgms_shared::utils::validation::{is_valid_email, is_valid_username, normalize_email};

use crate::domain::entities::user::{User, UserRole, UserStatus};
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{UserFilter, UserRepository};

use super::image_host::ImageHost;

/// Fields a user may change on their own profile
///
/// `None` means "leave unchanged"; email and username changes re-check
/// uniqueness.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
}

/// Service for profile CRUD, avatars and admin account maintenance
pub struct UserService<U: UserRepository> {
    user_repository: Arc<U>,
    image_host: Arc<dyn ImageHost>,
}

impl<U: UserRepository> UserService<U> {
    /// Create a new user service
    pub fn new(user_repository: Arc<U>, image_host: Arc<dyn ImageHost>) -> Self {
        Self {
            user_repository,
            image_host,
        }
    }

    /// Load a user's profile
    pub async fn get_profile(&self, user_id: Uuid) -> DomainResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "User".to_string(),
            })
    }

    /// Apply a profile update
    ///
    /// Changing the email resets the verified flag; the address has to be
    /// proven again through the OTP flow.
    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> DomainResult<User> {
        let mut user = self.get_profile(user_id).await?;

        if let Some(email) = update.email {
            let email = normalize_email(&email);
            if !is_valid_email(&email) {
                return Err(ValidationError::InvalidEmail.into());
            }
            if email != user.email {
                if self.user_repository.exists_by_email(&email).await? {
                    return Err(AuthError::EmailAlreadyExists.into());
                }
                user.email = email;
                user.is_email_verified = false;
            }
        }

        if let Some(username) = update.username {
            if !is_valid_username(&username) {
                return Err(ValidationError::InvalidUsername.into());
            }
            if username != user.username {
                if self.user_repository.exists_by_username(&username).await? {
                    return Err(AuthError::UsernameAlreadyExists.into());
                }
                user.username = username;
            }
        }

        if let Some(first_name) = update.first_name {
            user.profile.first_name = non_empty(first_name);
        }
        if let Some(last_name) = update.last_name {
            user.profile.last_name = non_empty(last_name);
        }
        if let Some(phone) = update.phone {
            user.profile.phone = non_empty(phone);
        }
        if let Some(dob) = update.date_of_birth {
            user.profile.date_of_birth = Some(dob);
        }

        user.updated_at = chrono::Utc::now();
        let user = self.user_repository.update(user).await?;
        tracing::info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    /// Upload a new avatar and replace the previous one
    ///
    /// The old asset is deleted best-effort after the profile is saved;
    /// a failed delete is logged and never surfaced.
    pub async fn set_avatar(
        &self,
        user_id: Uuid,
        bytes: &[u8],
        content_type: &str,
    ) -> DomainResult<User> {
        let mut user = self.get_profile(user_id).await?;

        let uploaded = self
            .image_host
            .upload(bytes, content_type)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "avatar upload failed");
                DomainError::internal(format!("image upload failed: {e}"))
            })?;

        let previous = user.set_avatar(uploaded.url, uploaded.asset_id);
        let user = self.user_repository.update(user).await?;

        if let Some(asset_id) = previous {
            self.delete_asset_best_effort(&asset_id).await;
        }

        tracing::info!(user_id = %user.id, "avatar updated");
        Ok(user)
    }

    /// Remove the avatar, deleting the hosted asset best-effort
    pub async fn remove_avatar(&self, user_id: Uuid) -> DomainResult<User> {
        let mut user = self.get_profile(user_id).await?;

        let previous = user.clear_avatar();
        let user = self.user_repository.update(user).await?;

        if let Some(asset_id) = previous {
            self.delete_asset_best_effort(&asset_id).await;
        }

        Ok(user)
    }

    /// Deactivate the caller's own account
    pub async fn deactivate(&self, user_id: Uuid) -> DomainResult<User> {
        let mut user = self.get_profile(user_id).await?;
        user.status = UserStatus::Inactive;
        user.updated_at = chrono::Utc::now();
        let user = self.user_repository.update(user).await?;
        tracing::info!(user_id = %user.id, "account deactivated");
        Ok(user)
    }

    /// Permanently delete an account (admin operation)
    pub async fn delete_account(&self, user_id: Uuid) -> DomainResult<()> {
        let user = self.get_profile(user_id).await?;

        if !self.user_repository.delete(user.id).await? {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        if let Some(asset_id) = user.profile.avatar_id {
            self.delete_asset_best_effort(&asset_id).await;
        }

        tracing::info!(user_id = %user.id, "account deleted");
        Ok(())
    }

    /// List users for the admin screens
    pub async fn list_users(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u32,
    ) -> DomainResult<(Vec<User>, u64)> {
        self.user_repository.list(filter, offset, limit).await
    }

    /// Change a user's role and/or status (admin operation)
    pub async fn admin_update(
        &self,
        user_id: Uuid,
        role: Option<UserRole>,
        status: Option<UserStatus>,
    ) -> DomainResult<User> {
        let mut user = self.get_profile(user_id).await?;

        if let Some(role) = role {
            user.role = role;
        }
        if let Some(status) = status {
            user.status = status;
        }
        user.updated_at = chrono::Utc::now();

        let user = self.user_repository.update(user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, status = user.status.as_str(), "account updated by admin");
        Ok(user)
    }

    async fn delete_asset_best_effort(&self, asset_id: &str) {
        if let Err(e) = self.image_host.delete(asset_id).await {
            tracing::warn!(asset_id, error = %e, "failed to delete image asset, continuing");
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
