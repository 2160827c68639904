//! User repository

use crate::domain::{CreateUserInput, StringUuid, UpdateProfileInput, UpdateSettingsInput, User};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, role, agency_id, \
     phone_number, address, email_verified, notify_email, notify_push, notify_sms, \
     created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, input: &CreateUserInput, password_hash: &str) -> Result<User>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_agency(&self, agency_id: StringUuid) -> Result<Vec<User>>;
    async fn update_profile(&self, id: StringUuid, input: &UpdateProfileInput) -> Result<User>;
    async fn update_settings(&self, id: StringUuid, input: &UpdateSettingsInput) -> Result<User>;
    async fn update_password(&self, id: StringUuid, password_hash: &str) -> Result<()>;
    async fn set_email_verified(&self, id: StringUuid) -> Result<()>;
}

pub struct UserRepositoryImpl {
    pool: MySqlPool,
}

impl UserRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn get(&self, id: StringUuid) -> Result<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, input: &CreateUserInput, password_hash: &str) -> Result<User> {
        let id = StringUuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO users
                (id, email, password_hash, first_name, last_name, role, agency_id,
                 phone_number, address, email_verified, notify_email, notify_push, notify_sms,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, false, true, false, false, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(&input.email)
        .bind(password_hash)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.role)
        .bind(input.agency_id.map(StringUuid::from))
        .bind(&input.phone_number)
        .bind(&input.address)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_agency(&self, agency_id: StringUuid) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE agency_id = ? ORDER BY created_at"
        ))
        .bind(agency_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn update_profile(&self, id: StringUuid, input: &UpdateProfileInput) -> Result<User> {
        let existing = self.get(id).await?;

        let first_name = input.first_name.as_ref().unwrap_or(&existing.first_name);
        let last_name = input.last_name.as_ref().unwrap_or(&existing.last_name);
        let phone_number = input.phone_number.as_ref().or(existing.phone_number.as_ref());
        let address = input.address.as_ref().or(existing.address.as_ref());

        sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, phone_number = ?, address = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(phone_number)
        .bind(address)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    async fn update_settings(&self, id: StringUuid, input: &UpdateSettingsInput) -> Result<User> {
        let existing = self.get(id).await?;

        let notify_email = input.notify_email.unwrap_or(existing.notify_email);
        let notify_push = input.notify_push.unwrap_or(existing.notify_push);
        let notify_sms = input.notify_sms.unwrap_or(existing.notify_sms);

        sqlx::query(
            r#"
            UPDATE users
            SET notify_email = ?, notify_push = ?, notify_sms = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(notify_email)
        .bind(notify_push)
        .bind(notify_sms)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    async fn update_password(&self, id: StringUuid, password_hash: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?, updated_at = NOW() WHERE id = ?",
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    async fn set_email_verified(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET email_verified = true, updated_at = NOW() WHERE id = ?",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}
