//! User domain model

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// User role. Serialized in kebab-case both in JSON and in the database
/// (`CHAR`/`VARCHAR` column), matching the wire format of the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum Role {
    Citizen,
    Agency,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Admins and super-admins bypass ownership scoping entirely
    pub fn is_admin_tier(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Agency => "agency",
            Role::Admin => "admin",
            Role::SuperAdmin => "super-admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity.
///
/// `agency_id` is set iff the role is `agency` (or an `admin` tied to an
/// agency); `AuthService::register` enforces that invariant on creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: StringUuid,
    pub email: String,
    /// Argon2 hash; never leaves the server
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub agency_id: Option<StringUuid>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub email_verified: bool,
    pub notify_email: bool,
    pub notify_push: bool,
    pub notify_sms: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a new user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub agency_id: Option<Uuid>,
    #[validate(length(max = 30))]
    pub phone_number: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

fn default_role() -> Role {
    Role::Citizen
}

/// Input for updating the caller's own profile
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 30))]
    pub phone_number: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

/// Input for updating notification settings
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingsInput {
    pub notify_email: Option<bool>,
    pub notify_push: Option<bool>,
    pub notify_sms: Option<bool>,
}

/// Notification settings projection (for `GET /settings`)
#[derive(Debug, Clone, Serialize)]
pub struct UserSettings {
    pub email: String,
    pub notify_email: bool,
    pub notify_push: bool,
    pub notify_sms: bool,
}

impl From<&User> for UserSettings {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            notify_email: user.notify_email,
            notify_push: user.notify_push,
            notify_sms: user.notify_sms,
        }
    }
}
