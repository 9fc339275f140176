use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::user::{User, UserRole, UserStatus};
use crate::errors::{AuthError, DomainError};
use crate::repositories::user::MockUserRepository;
use crate::repositories::UserFilter;

use super::image_host::{ImageHost, UploadedImage};
use super::service::{ProfileUpdate, UserService};

/// Image host double counting uploads/deletes; deletes can be set to fail
struct FakeImageHost {
    uploads: RwLock<u32>,
    deleted: RwLock<Vec<String>>,
    fail_deletes: bool,
}

impl FakeImageHost {
    fn new(fail_deletes: bool) -> Self {
        Self {
            uploads: RwLock::new(0),
            deleted: RwLock::new(Vec::new()),
            fail_deletes,
        }
    }
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, _bytes: &[u8], _content_type: &str) -> Result<UploadedImage, String> {
        let mut uploads = self.uploads.write().await;
        *uploads += 1;
        Ok(UploadedImage {
            url: format!("https://img.example/{}.jpg", *uploads),
            asset_id: format!("asset-{}", *uploads),
        })
    }

    async fn delete(&self, asset_id: &str) -> Result<(), String> {
        if self.fail_deletes {
            return Err("image host unavailable".to_string());
        }
        self.deleted.write().await.push(asset_id.to_string());
        Ok(())
    }
}

async fn setup(
    fail_deletes: bool,
) -> (
    UserService<MockUserRepository>,
    Arc<MockUserRepository>,
    Arc<FakeImageHost>,
    User,
) {
    let users = Arc::new(MockUserRepository::new());
    let host = Arc::new(FakeImageHost::new(fail_deletes));
    let user = User::new(
        "member@gym.com".to_string(),
        "bob".to_string(),
        "hash".to_string(),
        UserRole::Member,
    );
    users.insert(user.clone()).await;
    let host_dyn: Arc<dyn ImageHost> = host.clone();
    let service = UserService::new(Arc::clone(&users), host_dyn);
    (service, users, host, user)
}

#[tokio::test]
async fn test_update_profile_fields() {
    let (service, _users, _host, user) = setup(false).await;

    let updated = service
        .update_profile(
            user.id,
            ProfileUpdate {
                first_name: Some("Bob".to_string()),
                last_name: Some("Jones".to_string()),
                phone: Some("+14155550100".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.profile.full_name(), Some("Bob Jones".to_string()));
    assert_eq!(updated.profile.phone.as_deref(), Some("+14155550100"));
}

#[tokio::test]
async fn test_email_change_resets_verification_and_checks_uniqueness() {
    let (service, users, _host, user) = setup(false).await;

    let mut verified = users.get(user.id).await.unwrap();
    verified.verify_email();
    users.insert(verified).await;

    let updated = service
        .update_profile(
            user.id,
            ProfileUpdate {
                email: Some("Fresh@Gym.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "fresh@gym.com");
    assert!(!updated.is_email_verified);

    // A second user cannot take that address
    let other = User::new(
        "other@gym.com".to_string(),
        "alice".to_string(),
        "hash".to_string(),
        UserRole::Member,
    );
    users.insert(other.clone()).await;
    let err = service
        .update_profile(
            other.id,
            ProfileUpdate {
                email: Some("fresh@gym.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::EmailAlreadyExists)
    ));
}

#[tokio::test]
async fn test_avatar_replace_deletes_old_asset() {
    let (service, _users, host, user) = setup(false).await;

    let first = service.set_avatar(user.id, b"img1", "image/jpeg").await.unwrap();
    assert_eq!(first.profile.avatar_id.as_deref(), Some("asset-1"));

    let second = service.set_avatar(user.id, b"img2", "image/png").await.unwrap();
    assert_eq!(second.profile.avatar_id.as_deref(), Some("asset-2"));

    // The replaced asset got cleaned up at the host
    assert_eq!(host.deleted.read().await.as_slice(), ["asset-1"]);
}

#[tokio::test]
async fn test_avatar_delete_failure_is_swallowed() {
    let (service, _users, _host, user) = setup(true).await;

    service.set_avatar(user.id, b"img1", "image/jpeg").await.unwrap();
    // Replacing still succeeds even though the host refuses the delete
    let updated = service.set_avatar(user.id, b"img2", "image/jpeg").await.unwrap();
    assert_eq!(updated.profile.avatar_id.as_deref(), Some("asset-2"));

    // Removing also succeeds
    let cleared = service.remove_avatar(user.id).await.unwrap();
    assert!(cleared.profile.avatar_url.is_none());
}

#[tokio::test]
async fn test_deactivate_sets_inactive() {
    let (service, _users, _host, user) = setup(false).await;

    let updated = service.deactivate(user.id).await.unwrap();
    assert_eq!(updated.status, UserStatus::Inactive);
}

#[tokio::test]
async fn test_admin_update_and_listing_filters() {
    let (service, users, _host, user) = setup(false).await;

    let trainer = User::new(
        "trainer@gym.com".to_string(),
        "trainer1".to_string(),
        "hash".to_string(),
        UserRole::Trainer,
    );
    users.insert(trainer.clone()).await;

    service
        .admin_update(user.id, Some(UserRole::Manager), Some(UserStatus::Suspended))
        .await
        .unwrap();

    let filter = UserFilter {
        role: Some(UserRole::Manager),
        ..Default::default()
    };
    let (page, total) = service.list_users(&filter, 0, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(page[0].id, user.id);
    assert_eq!(page[0].status, UserStatus::Suspended);

    let (all, all_total) = service.list_users(&UserFilter::default(), 0, 10).await.unwrap();
    assert_eq!(all_total, 2);
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_missing_user_is_not_found() {
    let (service, _users, _host, _user) = setup(false).await;

    let err = service.get_profile(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
