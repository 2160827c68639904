//! Data access layer (Repository pattern)

pub mod category;
pub mod complaint;
pub mod otp;
pub mod user;

pub use category::CategoryRepository;
pub use complaint::ComplaintRepository;
pub use otp::OtpRepository;
pub use user::UserRepository;
