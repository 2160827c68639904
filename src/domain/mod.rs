//! Domain models

pub mod category;
pub mod common;
pub mod complaint;
pub mod email;
pub mod otp;
pub mod user;

pub use category::{Category, CreateCategoryInput, UpdateCategoryInput};
pub use common::StringUuid;
pub use complaint::{
    Complaint, ComplaintFilter, ComplaintStatus, CreateComplaintInput, UpdateComplaintStatusInput,
};
pub use email::EmailMessage;
pub use otp::EmailOtp;
pub use user::{
    CreateUserInput, Role, UpdateProfileInput, UpdateSettingsInput, User, UserSettings,
};
