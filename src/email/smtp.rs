//! SMTP email provider implementation using lettre

use super::provider::{EmailProvider, EmailProviderError};
use crate::config::SmtpConfig;
use crate::domain::EmailMessage;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

pub struct SmtpEmailProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name: Option<String>,
}

impl SmtpEmailProvider {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, EmailProviderError> {
        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| EmailProviderError::InvalidConfiguration(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        })
    }

    fn from_mailbox(&self) -> Result<Mailbox, EmailProviderError> {
        let mailbox = match &self.from_name {
            Some(name) => format!("{} <{}>", name, self.from_email),
            None => self.from_email.clone(),
        };

        mailbox.parse().map_err(|e| {
            EmailProviderError::InvalidConfiguration(format!("Invalid from address: {}", e))
        })
    }

    fn to_mailbox(message: &EmailMessage) -> Result<Mailbox, EmailProviderError> {
        let mailbox = match &message.to_name {
            Some(name) => format!("{} <{}>", name, message.to),
            None => message.to.clone(),
        };

        mailbox.parse().map_err(|e| {
            EmailProviderError::InvalidConfiguration(format!("Invalid to address: {}", e))
        })
    }
}

#[async_trait]
impl EmailProvider for SmtpEmailProvider {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailProviderError> {
        let builder = Message::builder()
            .from(self.from_mailbox()?)
            .to(Self::to_mailbox(message)?)
            .subject(&message.subject);

        let email = match &message.text_body {
            Some(text) => builder
                .multipart(
                    MultiPart::alternative()
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_PLAIN)
                                .body(text.clone()),
                        )
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_HTML)
                                .body(message.html_body.clone()),
                        ),
                )
                .map_err(|e| EmailProviderError::SendFailed(e.to_string()))?,
            None => builder
                .header(ContentType::TEXT_HTML)
                .body(message.html_body.clone())
                .map_err(|e| EmailProviderError::SendFailed(e.to_string()))?,
        };

        self.transport
            .send(email)
            .await
            .map_err(|e| EmailProviderError::SendFailed(e.to_string()))?;

        tracing::debug!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "smtp"
    }
}
