//! Shared application state traits.
//!
//! Handlers and extractors are generic over these traits so the router can be
//! built against the real sqlx-backed state in production and lightweight
//! in-memory state in tests.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{CategoryRepository, ComplaintRepository, OtpRepository, UserRepository};
use crate::service::{AuthService, CategoryService, ComplaintService, UserService};
use async_trait::async_trait;

/// Minimal state needed by the authentication extractor: token verification
/// plus principal resolution against current user records.
pub trait AuthState: Clone + Send + Sync + 'static {
    type Users: UserRepository + 'static;

    fn jwt_manager(&self) -> &JwtManager;
    fn users(&self) -> &Self::Users;
}

/// Full state consumed by the API handlers.
#[async_trait]
pub trait HasServices: AuthState {
    type Complaints: ComplaintRepository + 'static;
    type Categories: CategoryRepository + 'static;
    type Otps: OtpRepository + 'static;

    fn config(&self) -> &Config;
    fn auth_service(&self) -> &AuthService<Self::Users, Self::Otps>;
    fn user_service(&self) -> &UserService<Self::Users>;
    fn complaint_service(&self) -> &ComplaintService<Self::Complaints, Self::Users>;
    fn category_service(&self) -> &CategoryService<Self::Categories>;

    /// Readiness probe; the production state pings the database.
    async fn is_ready(&self) -> bool;
}
