//! Log-only email provider for development and tests.
//!
//! Used when no SMTP configuration is present so registration flows still
//! work locally; codes end up in the log instead of a mailbox.

use super::provider::{EmailProvider, EmailProviderError};
use crate::domain::EmailMessage;
use async_trait::async_trait;

#[derive(Default)]
pub struct ConsoleEmailProvider;

#[async_trait]
impl EmailProvider for ConsoleEmailProvider {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailProviderError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text_body.as_deref().unwrap_or(&message.html_body),
            "Email (console provider)"
        );
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "console"
    }
}
