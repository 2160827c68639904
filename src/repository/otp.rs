//! Email verification codes.
//!
//! One live code per user; issuing a new code replaces the previous one.

use crate::domain::{EmailOtp, StringUuid};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpRepository: Send + Sync {
    async fn replace(
        &self,
        user_id: StringUuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<EmailOtp>;
    async fn find_valid(
        &self,
        user_id: StringUuid,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<EmailOtp>>;
    async fn delete_for_user(&self, user_id: StringUuid) -> Result<()>;
}

pub struct OtpRepositoryImpl {
    pool: MySqlPool,
}

impl OtpRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpRepository for OtpRepositoryImpl {
    async fn replace(
        &self,
        user_id: StringUuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<EmailOtp> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM email_otps WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let id = StringUuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO email_otps (id, user_id, code, expires_at, created_at)
            VALUES (?, ?, ?, ?, NOW())
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(code)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let otp = sqlx::query_as::<_, EmailOtp>(
            "SELECT id, user_id, code, expires_at, created_at FROM email_otps WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(otp)
    }

    async fn find_valid(
        &self,
        user_id: StringUuid,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<EmailOtp>> {
        let otp = sqlx::query_as::<_, EmailOtp>(
            r#"
            SELECT id, user_id, code, expires_at, created_at
            FROM email_otps
            WHERE user_id = ? AND code = ? AND expires_at > ?
            "#,
        )
        .bind(user_id)
        .bind(code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(otp)
    }

    async fn delete_for_user(&self, user_id: StringUuid) -> Result<()> {
        sqlx::query("DELETE FROM email_otps WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
