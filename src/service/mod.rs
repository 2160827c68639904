//! Business logic layer

pub mod auth;
pub mod category;
pub mod complaint;
pub mod notification;
pub mod user;

pub use auth::AuthService;
pub use category::CategoryService;
pub use complaint::ComplaintService;
pub use notification::NotificationService;
pub use user::UserService;
