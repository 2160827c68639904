//! Authentication service: registration, login, email verification,
//! password reset.

use crate::domain::{CreateUserInput, EmailMessage, Role, StringUuid, User};
use crate::email::EmailProvider;
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::{OtpRepository, UserRepository};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use rand::Rng;
use std::sync::Arc;
use validator::Validate;

const OTP_TTL_MINUTES: i64 = 10;

pub struct AuthService<U: UserRepository, O: OtpRepository> {
    users: Arc<U>,
    otps: Arc<O>,
    jwt: Arc<JwtManager>,
    email: Arc<dyn EmailProvider>,
}

impl<U: UserRepository, O: OtpRepository> AuthService<U, O> {
    pub fn new(
        users: Arc<U>,
        otps: Arc<O>,
        jwt: Arc<JwtManager>,
        email: Arc<dyn EmailProvider>,
    ) -> Self {
        Self {
            users,
            otps,
            jwt,
            email,
        }
    }

    /// Register a new user and mint an access token.
    ///
    /// An agency account must reference its agency; citizen and super-admin
    /// accounts must not.
    pub async fn register(&self, input: CreateUserInput) -> Result<(User, String)> {
        input.validate()?;

        match input.role {
            Role::Agency if input.agency_id.is_none() => {
                return Err(AppError::BadRequest(
                    "Agency accounts require an agency_id".to_string(),
                ));
            }
            Role::Citizen | Role::SuperAdmin if input.agency_id.is_some() => {
                return Err(AppError::BadRequest(format!(
                    "Role '{}' cannot reference an agency",
                    input.role
                )));
            }
            _ => {}
        }

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self.users.create(&input, &password_hash).await?;

        self.issue_verification_code(&user).await?;

        let token = self.jwt.create_access_token(user.id.into(), user.role)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok((user, token))
    }

    /// Verify credentials and mint an access token. The same 401 is returned
    /// for an unknown email and a bad password.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self.users.find_by_email(email).await?;

        let user = match user {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                return Err(AppError::Unauthorized(
                    "Invalid email or password".to_string(),
                ));
            }
        };

        let token = self.jwt.create_access_token(user.id.into(), user.role)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    /// Consume a verification code and mark the account verified.
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<()> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.email_verified {
            return Ok(());
        }

        let otp = self
            .otps
            .find_valid(user.id, code, Utc::now())
            .await?
            .ok_or_else(|| {
                AppError::BadRequest("Invalid or expired verification code".to_string())
            })?;

        self.users.set_email_verified(user.id).await?;
        self.otps.delete_for_user(otp.user_id).await?;

        tracing::info!(user_id = %user.id, "Email verified");
        Ok(())
    }

    /// Issue a fresh verification code, replacing any outstanding one.
    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.email_verified {
            return Err(AppError::BadRequest(
                "Email is already verified".to_string(),
            ));
        }

        self.issue_verification_code(&user).await
    }

    /// Set a new password by email lookup.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<()> {
        if new_password.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let password_hash = hash_password(new_password)?;
        self.users.update_password(user.id, &password_hash).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    pub async fn find_user(&self, id: StringUuid) -> Result<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn issue_verification_code(&self, user: &User) -> Result<()> {
        let code = generate_otp_code();
        let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);
        self.otps.replace(user.id, &code, expires_at).await?;

        let message = EmailMessage::new(
            user.email.clone(),
            "Verify your email",
            format!(
                "<p>Your verification code is <strong>{}</strong>. It expires in {} minutes.</p>",
                code, OTP_TTL_MINUTES
            ),
        )
        .with_to_name(format!("{} {}", user.first_name, user.last_name))
        .with_text_body(format!(
            "Your verification code is {}. It expires in {} minutes.",
            code, OTP_TTL_MINUTES
        ));

        // Verification mail failure must not fail registration.
        if let Err(e) = self.email.send(&message).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send verification email");
        }

        Ok(())
    }
}

fn generate_otp_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

pub(crate) fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::email::provider::MockEmailProvider;
    use crate::repository::otp::MockOtpRepository;
    use crate::repository::user::MockUserRepository;
    use chrono::Utc;

    fn jwt() -> Arc<JwtManager> {
        Arc::new(JwtManager::new(JwtConfig {
            secret: "test-secret-key-for-auth-service".to_string(),
            issuer: "civica-test".to_string(),
            access_token_ttl_secs: 3600,
        }))
    }

    fn email_ok() -> Arc<MockEmailProvider> {
        let mut email = MockEmailProvider::new();
        email.expect_send().returning(|_| Ok(()));
        Arc::new(email)
    }

    fn test_user(role: Role, password_hash: String) -> User {
        let now = Utc::now();
        User {
            id: StringUuid::new_v4(),
            email: "jane@example.com".to_string(),
            password_hash,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            role,
            agency_id: None,
            phone_number: None,
            address: None,
            email_verified: false,
            notify_email: true,
            notify_push: false,
            notify_sms: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn citizen_input() -> CreateUserInput {
        CreateUserInput {
            email: "jane@example.com".to_string(),
            password: "correct-horse".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            role: Role::Citizen,
            agency_id: None,
            phone_number: None,
            address: None,
        }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn test_verify_password_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_otp_code_is_six_digits() {
        for _ in 0..32 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflict() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(test_user(Role::Citizen, "h".to_string()))));

        let service = AuthService::new(
            Arc::new(users),
            Arc::new(MockOtpRepository::new()),
            jwt(),
            email_ok(),
        );

        let result = service.register(citizen_input()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_agency_without_agency_id_rejected() {
        let service = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockOtpRepository::new()),
            jwt(),
            email_ok(),
        );

        let mut input = citizen_input();
        input.role = Role::Agency;

        let result = service.register(input).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_register_citizen_with_agency_id_rejected() {
        let service = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockOtpRepository::new()),
            jwt(),
            email_ok(),
        );

        let mut input = citizen_input();
        input.agency_id = Some(uuid::Uuid::new_v4());

        let result = service.register(input).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_bad_password_same_error() {
        let hash = hash_password("right-password").unwrap();

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |email| {
            if email == "jane@example.com" {
                Ok(Some(test_user(Role::Citizen, hash.clone())))
            } else {
                Ok(None)
            }
        });

        let service = AuthService::new(
            Arc::new(users),
            Arc::new(MockOtpRepository::new()),
            jwt(),
            email_ok(),
        );

        let unknown = service.login("nobody@example.com", "whatever").await;
        let bad_password = service.login("jane@example.com", "wrong").await;

        let msg = |r: Result<(User, String)>| match r {
            Err(AppError::Unauthorized(m)) => m,
            other => panic!("Expected Unauthorized, got {:?}", other.map(|_| ())),
        };
        assert_eq!(msg(unknown), msg(bad_password));
    }

    #[tokio::test]
    async fn test_login_success_returns_token() {
        let hash = hash_password("right-password").unwrap();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(test_user(Role::Citizen, hash.clone()))));

        let service = AuthService::new(
            Arc::new(users),
            Arc::new(MockOtpRepository::new()),
            jwt(),
            email_ok(),
        );

        let (user, token) = service
            .login("jane@example.com", "right-password")
            .await
            .unwrap();
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(token.split('.').count(), 3);
    }

    #[tokio::test]
    async fn test_verify_email_invalid_code() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(test_user(Role::Citizen, "h".to_string()))));

        let mut otps = MockOtpRepository::new();
        otps.expect_find_valid().returning(|_, _, _| Ok(None));

        let service = AuthService::new(Arc::new(users), Arc::new(otps), jwt(), email_ok());

        let result = service.verify_email("jane@example.com", "000000").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_verify_email_already_verified_is_noop() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| {
            let mut user = test_user(Role::Citizen, "h".to_string());
            user.email_verified = true;
            Ok(Some(user))
        });

        // No OTP expectations: the lookup must be skipped entirely.
        let service = AuthService::new(
            Arc::new(users),
            Arc::new(MockOtpRepository::new()),
            jwt(),
            email_ok(),
        );

        assert!(service
            .verify_email("jane@example.com", "123456")
            .await
            .is_ok());
    }
}
