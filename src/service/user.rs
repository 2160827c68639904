//! Self-scoped profile and settings operations.

use crate::domain::{UpdateProfileInput, UpdateSettingsInput, User, UserSettings};
use crate::error::{AppError, Result};
use crate::middleware::Principal;
use crate::repository::UserRepository;
use std::sync::Arc;
use validator::Validate;

pub struct UserService<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn get_profile(&self, principal: &Principal) -> Result<User> {
        self.users
            .find_by_id(principal.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(
        &self,
        principal: &Principal,
        input: UpdateProfileInput,
    ) -> Result<User> {
        input.validate()?;
        self.users.update_profile(principal.id, &input).await
    }

    pub async fn get_settings(&self, principal: &Principal) -> Result<UserSettings> {
        let user = self.get_profile(principal).await?;
        Ok(UserSettings::from(&user))
    }

    pub async fn update_settings(
        &self,
        principal: &Principal,
        input: UpdateSettingsInput,
    ) -> Result<UserSettings> {
        let user = self.users.update_settings(principal.id, &input).await?;
        Ok(UserSettings::from(&user))
    }
}
