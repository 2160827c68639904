//! HTTP server wiring: state construction, router, startup.

use crate::api;
use crate::config::Config;
use crate::error::set_expose_internal_detail;
use crate::jwt::JwtManager;
use crate::middleware::security_headers;
use crate::repository::{
    category::CategoryRepositoryImpl, complaint::ComplaintRepositoryImpl, otp::OtpRepositoryImpl,
    user::UserRepositoryImpl,
};
use crate::service::{
    AuthService, CategoryService, ComplaintService, NotificationService, UserService,
};
use crate::state::{AuthState, HasServices};
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Production application state over the sqlx-backed repositories.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    db_pool: MySqlPool,
    jwt_manager: Arc<JwtManager>,
    user_repo: Arc<UserRepositoryImpl>,
    auth_service: Arc<AuthService<UserRepositoryImpl, OtpRepositoryImpl>>,
    user_service: Arc<UserService<UserRepositoryImpl>>,
    complaint_service: Arc<ComplaintService<ComplaintRepositoryImpl, UserRepositoryImpl>>,
    category_service: Arc<CategoryService<CategoryRepositoryImpl>>,
}

impl AppState {
    pub fn new(config: Config, db_pool: MySqlPool) -> Self {
        let config = Arc::new(config);
        let jwt_manager = Arc::new(JwtManager::new(config.jwt.clone()));

        let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
        let complaint_repo = Arc::new(ComplaintRepositoryImpl::new(db_pool.clone()));
        let category_repo = Arc::new(CategoryRepositoryImpl::new(db_pool.clone()));
        let otp_repo = Arc::new(OtpRepositoryImpl::new(db_pool.clone()));

        let email = crate::email::build_provider(config.smtp.as_ref());
        let notifier = Arc::new(NotificationService::new(user_repo.clone(), email.clone()));

        let auth_service = Arc::new(AuthService::new(
            user_repo.clone(),
            otp_repo,
            jwt_manager.clone(),
            email,
        ));
        let user_service = Arc::new(UserService::new(user_repo.clone()));
        let complaint_service = Arc::new(ComplaintService::new(complaint_repo, notifier));
        let category_service = Arc::new(CategoryService::new(category_repo));

        Self {
            config,
            db_pool,
            jwt_manager,
            user_repo,
            auth_service,
            user_service,
            complaint_service,
            category_service,
        }
    }
}

impl AuthState for AppState {
    type Users = UserRepositoryImpl;

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    fn users(&self) -> &UserRepositoryImpl {
        &self.user_repo
    }
}

#[async_trait]
impl HasServices for AppState {
    type Complaints = ComplaintRepositoryImpl;
    type Categories = CategoryRepositoryImpl;
    type Otps = OtpRepositoryImpl;

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
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

/// Build the router over any state implementing `HasServices`. Tests reuse
/// this with an in-memory state.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        // Auth
        .route("/api/v1/auth/register", post(api::auth::register::<S>))
        .route("/api/v1/auth/login", post(api::auth::login::<S>))
        .route("/api/v1/auth/logout", post(api::auth::logout))
        .route(
            "/api/v1/auth/verify-email",
            post(api::auth::verify_email::<S>),
        )
        .route(
            "/api/v1/auth/resend-verification",
            post(api::auth::resend_verification::<S>),
        )
        .route(
            "/api/v1/auth/reset-password",
            post(api::auth::reset_password::<S>),
        )
        .route("/api/v1/auth/me", get(api::auth::me::<S>))
        .route(
            "/api/v1/auth/profile",
            get(api::auth::get_profile::<S>).put(api::auth::update_profile::<S>),
        )
        .route(
            "/api/v1/auth/settings",
            get(api::auth::get_settings::<S>).put(api::auth::update_settings::<S>),
        )
        // Complaints
        .route(
            "/api/v1/complaints",
            post(api::complaint::create::<S>).get(api::complaint::list::<S>),
        )
        .route("/api/v1/complaints/{id}", get(api::complaint::get::<S>))
        .route(
            "/api/v1/complaints/{id}/status",
            put(api::complaint::update_status::<S>),
        )
        // Help center
        .route("/api/v1/help/faq", get(api::help::faq))
        .route("/api/v1/help/guides", get(api::help::guides))
        .route("/api/v1/help/contact", post(api::help::contact))
        // Categories
        .route(
            "/api/v1/categories",
            post(api::category::create::<S>).get(api::category::list::<S>),
        )
        .route(
            "/api/v1/categories/{id}",
            get(api::category::get::<S>)
                .put(api::category::update::<S>)
                .delete(api::category::delete::<S>),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors)
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    set_expose_internal_detail(config.is_development());

    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    let http_addr = config.http_addr();
    let state = AppState::new(config, db_pool);
    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
