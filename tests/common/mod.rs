//! Shared test harness: in-memory repositories behind the repository traits,
//! a router state built on them, and small request helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use civica_core::config::{Config, DatabaseConfig, JwtConfig};
use civica_core::domain::{
    Category, Complaint, ComplaintFilter, ComplaintStatus, CreateCategoryInput,
    CreateComplaintInput, CreateUserInput, EmailOtp, StringUuid, UpdateCategoryInput,
    UpdateProfileInput, UpdateSettingsInput, User,
};
use civica_core::email::ConsoleEmailProvider;
use civica_core::error::{AppError, Result};
use civica_core::jwt::JwtManager;
use civica_core::policy::ComplaintScope;
use civica_core::repository::{
    CategoryRepository, ComplaintRepository, OtpRepository, UserRepository,
};
use civica_core::server::build_router;
use civica_core::service::{
    AuthService, CategoryService, ComplaintService, NotificationService, UserService,
};
use civica_core::state::{AuthState, HasServices};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
pub struct InMemoryUsers {
    records: Mutex<HashMap<StringUuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, input: &CreateUserInput, password_hash: &str) -> Result<User> {
        let now = Utc::now();
        let user = User {
            id: StringUuid::new_v4(),
            email: input.email.clone(),
            password_hash: password_hash.to_string(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            role: input.role,
            agency_id: input.agency_id.map(StringUuid::from),
            phone_number: input.phone_number.clone(),
            address: input.address.clone(),
            email_verified: false,
            notify_email: true,
            notify_push: false,
            notify_sms: false,
            created_at: now,
            updated_at: now,
        };
        self.records
            .lock()
            .unwrap()
            .insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<User>> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_agency(&self, agency_id: StringUuid) -> Result<Vec<User>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.agency_id == Some(agency_id))
            .cloned()
            .collect())
    }

    async fn update_profile(&self, id: StringUuid, input: &UpdateProfileInput) -> Result<User> {
        let mut records = self.records.lock().unwrap();
        let user = records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if let Some(first_name) = &input.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &input.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(phone_number) = &input.phone_number {
            user.phone_number = Some(phone_number.clone());
        }
        if let Some(address) = &input.address {
            user.address = Some(address.clone());
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_settings(&self, id: StringUuid, input: &UpdateSettingsInput) -> Result<User> {
        let mut records = self.records.lock().unwrap();
        let user = records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if let Some(notify_email) = input.notify_email {
            user.notify_email = notify_email;
        }
        if let Some(notify_push) = input.notify_push {
            user.notify_push = notify_push;
        }
        if let Some(notify_sms) = input.notify_sms {
            user.notify_sms = notify_sms;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: StringUuid, password_hash: &str) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let user = records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn set_email_verified(&self, id: StringUuid) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let user = records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        user.email_verified = true;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryComplaints {
    records: Mutex<HashMap<StringUuid, Complaint>>,
}

fn in_scope(complaint: &Complaint, scope: &ComplaintScope) -> bool {
    match scope {
        ComplaintScope::Unrestricted => true,
        ComplaintScope::Citizen(id) => complaint.citizen_id == *id,
        ComplaintScope::Agency(agency_id) => complaint.assigned_to == Some(*agency_id),
    }
}

fn matches_filter(complaint: &Complaint, filter: &ComplaintFilter) -> bool {
    if let Some(status) = filter.status {
        if complaint.status != status {
            return false;
        }
    }
    if let Some(category) = &filter.category {
        if &complaint.category != category {
            return false;
        }
    }
    true
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaints {
    async fn create(
        &self,
        citizen_id: StringUuid,
        input: &CreateComplaintInput,
    ) -> Result<Complaint> {
        let now = Utc::now();
        let complaint = Complaint {
            id: StringUuid::new_v4(),
            title: input.title.clone(),
            description: input.description.clone(),
            category: input.category.clone(),
            location: input.location.clone(),
            images: sqlx::types::Json(input.images.clone()),
            status: ComplaintStatus::Pending,
            citizen_id,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        };
        self.records
            .lock()
            .unwrap()
            .insert(complaint.id, complaint.clone());
        Ok(complaint)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Complaint>> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn list(
        &self,
        scope: ComplaintScope,
        filter: &ComplaintFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Complaint>> {
        let records = self.records.lock().unwrap();
        let mut visible: Vec<Complaint> = records
            .values()
            .filter(|c| in_scope(c, &scope) && matches_filter(c, filter))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, scope: ComplaintScope, filter: &ComplaintFilter) -> Result<i64> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .filter(|c| in_scope(c, &scope) && matches_filter(c, filter))
            .count() as i64)
    }

    async fn update_status(
        &self,
        id: StringUuid,
        status: ComplaintStatus,
        assigned_to: Option<StringUuid>,
    ) -> Result<Complaint> {
        let mut records = self.records.lock().unwrap();
        let complaint = records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", id)))?;
        complaint.status = status;
        if assigned_to.is_some() {
            complaint.assigned_to = assigned_to;
        }
        complaint.updated_at = Utc::now();
        Ok(complaint.clone())
    }
}

#[derive(Default)]
pub struct InMemoryCategories {
    records: Mutex<HashMap<StringUuid, Category>>,
}

#[async_trait]
impl CategoryRepository for InMemoryCategories {
    async fn create(&self, input: &CreateCategoryInput) -> Result<Category> {
        let now = Utc::now();
        let category = Category {
            id: StringUuid::new_v4(),
            name: input.name.clone(),
            description: input.description.clone(),
            agency_id: StringUuid::from(input.agency_id),
            created_at: now,
            updated_at: now,
        };
        self.records
            .lock()
            .unwrap()
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Category>> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list(&self, agency_id: Option<StringUuid>) -> Result<Vec<Category>> {
        let records = self.records.lock().unwrap();
        let mut categories: Vec<Category> = records
            .values()
            .filter(|c| agency_id.map_or(true, |id| c.agency_id == id))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update(&self, id: StringUuid, input: &UpdateCategoryInput) -> Result<Category> {
        let mut records = self.records.lock().unwrap();
        let category = records
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;
        if let Some(name) = &input.name {
            category.name = name.clone();
        }
        if let Some(description) = &input.description {
            category.description = description.clone();
        }
        if let Some(agency_id) = input.agency_id {
            category.agency_id = StringUuid::from(agency_id);
        }
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        self.records
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }
}

#[derive(Default)]
pub struct InMemoryOtps {
    records: Mutex<HashMap<StringUuid, EmailOtp>>,
}

impl InMemoryOtps {
    /// Read the outstanding code for a user, for verification-flow tests.
    pub fn current_code(&self, user_id: StringUuid) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|otp| otp.code.clone())
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtps {
    async fn replace(
        &self,
        user_id: StringUuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<EmailOtp> {
        let otp = EmailOtp {
            id: StringUuid::new_v4(),
            user_id,
            code: code.to_string(),
            expires_at,
            created_at: Utc::now(),
        };
        self.records.lock().unwrap().insert(user_id, otp.clone());
        Ok(otp)
    }

    async fn find_valid(
        &self,
        user_id: StringUuid,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<EmailOtp>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&user_id)
            .filter(|otp| otp.code == code && otp.expires_at > now)
            .cloned())
    }

    async fn delete_for_user(&self, user_id: StringUuid) -> Result<()> {
        self.records.lock().unwrap().remove(&user_id);
        Ok(())
    }
}

#[derive(Clone)]
pub struct TestState {
    config: Arc<Config>,
    jwt: Arc<JwtManager>,
    pub users: Arc<InMemoryUsers>,
    pub otps: Arc<InMemoryOtps>,
    auth_service: Arc<AuthService<InMemoryUsers, InMemoryOtps>>,
    user_service: Arc<UserService<InMemoryUsers>>,
    complaint_service: Arc<ComplaintService<InMemoryComplaints, InMemoryUsers>>,
    category_service: Arc<CategoryService<InMemoryCategories>>,
}

impl TestState {
    pub fn new() -> Self {
        let config = Arc::new(test_config());
        let jwt = Arc::new(JwtManager::new(config.jwt.clone()));

        let users = Arc::new(InMemoryUsers::default());
        let complaints = Arc::new(InMemoryComplaints::default());
        let categories = Arc::new(InMemoryCategories::default());
        let otps = Arc::new(InMemoryOtps::default());
        let email = Arc::new(ConsoleEmailProvider);

        let notifier = Arc::new(NotificationService::new(users.clone(), email.clone()));
        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            otps.clone(),
            jwt.clone(),
            email,
        ));
        let user_service = Arc::new(UserService::new(users.clone()));
        let complaint_service = Arc::new(ComplaintService::new(complaints, notifier));
        let category_service = Arc::new(CategoryService::new(categories));

        Self {
            config,
            jwt,
            users,
            otps,
            auth_service,
            user_service,
            complaint_service,
            category_service,
        }
    }
}

impl Default for TestState {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthState for TestState {
    type Users = InMemoryUsers;

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt
    }

    fn users(&self) -> &InMemoryUsers {
        &self.users
    }
}

#[async_trait]
impl HasServices for TestState {
    type Complaints = InMemoryComplaints;
    type Categories = InMemoryCategories;
    type Otps = InMemoryOtps;

    fn config(&self) -> &Config {
        &self.config
    }

    fn auth_service(&self) -> &AuthService<Self::Users, Self::Otps> {
        &self.auth_service
    }

    fn user_service(&self) -> &UserService<Self::Users> {
        &self.user_service
    }

    fn complaint_service(&self) -> &ComplaintService<Self::Complaints, Self::Users> {
        &self.complaint_service
    }

    fn category_service(&self) -> &CategoryService<Self::Categories> {
        &self.category_service
    }

    async fn is_ready(&self) -> bool {
        true
    }
}

fn test_config() -> Config {
    Config {
        http_host: "127.0.0.1".to_string(),
        http_port: 0,
        environment: "test".to_string(),
        database: DatabaseConfig {
            url: "mysql://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret-key".to_string(),
            issuer: "civica-test".to_string(),
            access_token_ttl_secs: 3600,
        },
        smtp: None,
    }
}

pub fn test_app() -> (Router, TestState) {
    let state = TestState::new();
    (build_router(state.clone()), state)
}

/// Fire one request at the router and decode the JSON body (if any).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Register a user through the API and return `(user json, token)`.
pub async fn register_user(
    app: &Router,
    email: &str,
    role: &str,
    agency_id: Option<&str>,
) -> (Value, String) {
    let mut body = serde_json::json!({
        "email": email,
        "password": "correct-horse-battery",
        "first_name": "Test",
        "last_name": "User",
        "role": role,
    });
    if let Some(agency_id) = agency_id {
        body["agency_id"] = Value::String(agency_id.to_string());
    }

    let (status, json) = send(app, "POST", "/api/v1/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {json}");
    let token = json["token"].as_str().unwrap().to_string();
    (json["user"].clone(), token)
}
