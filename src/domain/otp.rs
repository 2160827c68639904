//! Email verification codes

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One-time code mailed at registration. Valid for ten minutes, consumed
/// exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailOtp {
    pub id: StringUuid,
    pub user_id: StringUuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl EmailOtp {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
