//! Email provider trait and error types

use crate::domain::EmailMessage;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailProviderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Send failed: {0}")]
    SendFailed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email message
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
