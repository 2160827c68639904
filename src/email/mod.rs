//! Outbound email delivery

pub mod console;
pub mod provider;
pub mod smtp;

pub use console::ConsoleEmailProvider;
pub use provider::{EmailProvider, EmailProviderError};
pub use smtp::SmtpEmailProvider;

use crate::config::SmtpConfig;
use std::sync::Arc;

/// Build the configured provider, falling back to the console provider when
/// SMTP is absent or misconfigured.
pub fn build_provider(smtp: Option<&SmtpConfig>) -> Arc<dyn EmailProvider> {
    match smtp {
        Some(config) => match SmtpEmailProvider::from_config(config) {
            Ok(provider) => Arc::new(provider),
            Err(e) => {
                tracing::warn!(error = %e, "Invalid SMTP configuration, using console provider");
                Arc::new(ConsoleEmailProvider)
            }
        },
        None => Arc::new(ConsoleEmailProvider),
    }
}
