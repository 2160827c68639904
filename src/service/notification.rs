//! Notification dispatch.
//!
//! Best-effort only: every failure is logged and swallowed so resource
//! mutations never fail because a notification could not be delivered.

use crate::domain::{EmailMessage, StringUuid, User};
use crate::email::EmailProvider;
use crate::repository::UserRepository;
use std::sync::Arc;

pub struct NotificationService<U: UserRepository> {
    users: Arc<U>,
    email: Arc<dyn EmailProvider>,
}

impl<U: UserRepository> NotificationService<U> {
    pub fn new(users: Arc<U>, email: Arc<dyn EmailProvider>) -> Self {
        Self { users, email }
    }

    /// Notify a user by id. Unknown recipients are logged and skipped.
    pub async fn notify(&self, user_id: StringUuid, subject: &str, body: &str) {
        let user = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::debug!(%user_id, subject, "Notification recipient not found, skipping");
                return;
            }
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "Failed to resolve notification recipient");
                return;
            }
        };

        self.deliver(&user, subject, body).await;
    }

    /// Notify every user registered under an agency. `assigned_to` on a
    /// complaint references the agency, not a user record, so recipients are
    /// resolved through `agency_id`. An agency with no staff is a no-op.
    pub async fn notify_agency(&self, agency_id: StringUuid, subject: &str, body: &str) {
        let staff = match self.users.find_by_agency(agency_id).await {
            Ok(staff) => staff,
            Err(e) => {
                tracing::warn!(%agency_id, error = %e, "Failed to resolve agency recipients");
                return;
            }
        };

        if staff.is_empty() {
            tracing::debug!(%agency_id, subject, "Agency has no registered users, skipping");
            return;
        }

        for user in &staff {
            self.deliver(user, subject, body).await;
        }
    }

    async fn deliver(&self, user: &User, subject: &str, body: &str) {
        tracing::info!(user_id = %user.id, subject, "Notification: {}", body);

        if !user.notify_email {
            return;
        }

        let message = EmailMessage::new(
            user.email.clone(),
            subject.to_string(),
            format!("<p>{}</p>", body),
        )
        .with_to_name(format!("{} {}", user.first_name, user.last_name))
        .with_text_body(body.to_string());

        if let Err(e) = self.email.send(&message).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send notification email");
        }
    }
}
