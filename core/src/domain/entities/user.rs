//! User entity representing a registered member or staff account.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Failed login attempts before the account is locked
pub const MAX_LOGIN_ATTEMPTS: i32 = 5;

/// How long a lockout lasts (2 hours)
pub const LOCKOUT_DURATION_MINUTES: i64 = 120;

/// Role of a user within the gym
///
/// Roles are ordered: each role's numeric level dominates every role below
/// it, which is what `require_min_role` checks compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// A gym member
    Member,
    /// A trainer on staff
    Trainer,
    /// A gym manager
    Manager,
    /// A platform administrator
    Admin,
}

impl UserRole {
    /// Numeric position in the role hierarchy (higher dominates)
    pub fn level(&self) -> u8 {
        match self {
            UserRole::Member => 1,
            UserRole::Trainer => 2,
            UserRole::Manager => 3,
            UserRole::Admin => 4,
        }
    }

    /// Static permission set granted to this role
    ///
    /// `"*"` is the wildcard held by top roles and grants every permission.
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            UserRole::Member => &[
                "profile:read",
                "profile:update",
                "booking:create",
                "booking:cancel",
                "schedule:view",
            ],
            UserRole::Trainer => &[
                "profile:read",
                "profile:update",
                "booking:create",
                "booking:cancel",
                "schedule:view",
                "schedule:manage",
                "member:view",
                "equipment:maintain",
            ],
            UserRole::Manager => &[
                "profile:read",
                "profile:update",
                "booking:create",
                "booking:cancel",
                "schedule:view",
                "schedule:manage",
                "member:view",
                "member:manage",
                "equipment:maintain",
                "equipment:update",
                "reports:view",
                "reports:export",
            ],
            UserRole::Admin => &["*"],
        }
    }

    /// Check whether this role grants a permission
    pub fn has_permission(&self, permission: &str) -> bool {
        let perms = self.permissions();
        perms.contains(&"*") || perms.contains(&permission)
    }

    /// Database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Member => "member",
            UserRole::Trainer => "trainer",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(UserRole::Member),
            "trainer" => Ok(UserRole::Trainer),
            "manager" => Ok(UserRole::Manager),
            "admin" => Ok(UserRole::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status; gates authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Normal account, may authenticate
    Active,
    /// Deactivated by the user or an admin
    Inactive,
    /// Suspended by staff; may not authenticate
    Suspended,
}

impl UserStatus {
    /// Database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Suspended => "suspended",
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// Profile fields attached to a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// First name
    pub first_name: Option<String>,

    /// Last name
    pub last_name: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Avatar URL at the image host
    pub avatar_url: Option<String>,

    /// Image-host asset id of the avatar, kept for best-effort deletion
    /// when the avatar is replaced or removed
    pub avatar_id: Option<String>,

    /// Date of birth (ISO date)
    pub date_of_birth: Option<chrono::NaiveDate>,
}

impl UserProfile {
    /// Full display name, when at least one name part is present
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

/// User entity representing a registered account
///
/// The password never leaves the persistence boundary: `password_hash` is
/// skipped during serialization, so any DTO built from a `User` is safe to
/// return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Email address (unique, stored lowercased)
    pub email: String,

    /// Username (unique)
    pub username: String,

    /// Bcrypt password hash, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Role within the gym
    pub role: UserRole,

    /// Account status
    pub status: UserStatus,

    /// Profile fields
    pub profile: UserProfile,

    /// Whether the email address has been verified via OTP
    pub is_email_verified: bool,

    /// Timestamp of the user's last login
    pub last_login_at: Option<DateTime<Utc>>,

    /// Consecutive failed login attempts since the last success
    pub failed_login_attempts: i32,

    /// Until when the account is locked, if a lockout is in effect
    pub locked_until: Option<DateTime<Utc>>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user with a freshly hashed password
    pub fn new(email: String, username: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
            role,
            status: UserStatus::Active,
            profile: UserProfile::default(),
            is_email_verified: false,
            last_login_at: None,
            failed_login_attempts: 0,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a lockout is currently in effect
    pub fn is_locked(&self) -> bool {
        self.locked_until.map_or(false, |until| until > Utc::now())
    }

    /// Whether the account may authenticate at all
    pub fn can_authenticate(&self) -> bool {
        self.status == UserStatus::Active && !self.is_locked()
    }

    /// The lockout expiry a repository should store once the attempt count
    /// reaches [`MAX_LOGIN_ATTEMPTS`]
    pub fn lockout_expiry() -> DateTime<Utc> {
        Utc::now() + Duration::minutes(LOCKOUT_DURATION_MINUTES)
    }

    /// Marks the email as verified
    pub fn verify_email(&mut self) {
        self.is_email_verified = true;
        self.updated_at = Utc::now();
    }

    /// Updates the last login timestamp and clears lockout state
    pub fn record_successful_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.failed_login_attempts = 0;
        self.locked_until = None;
        self.updated_at = Utc::now();
    }

    /// Replaces the avatar, returning the previous image-host asset id so
    /// the caller can delete it best-effort
    pub fn set_avatar(&mut self, url: String, asset_id: String) -> Option<String> {
        let previous = self.profile.avatar_id.take();
        self.profile.avatar_url = Some(url);
        self.profile.avatar_id = Some(asset_id);
        self.updated_at = Utc::now();
        previous
    }

    /// Removes the avatar, returning the image-host asset id to delete
    pub fn clear_avatar(&mut self) -> Option<String> {
        self.profile.avatar_url = None;
        self.updated_at = Utc::now();
        self.profile.avatar_id.take()
    }
}
