//! Help-center endpoints: FAQ, guides, and a support contact form.
//!
//! FAQ and guides serve curated static content and are open to everyone.
//! Contact requires an authenticated citizen and answers with a ticket
//! reference; the request itself is recorded in the logs.

use crate::error::Result;
use crate::middleware::Guarded;
use crate::policy::CitizenOnly;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Guide {
    pub title: &'static str,
    pub content: &'static str,
    pub video_url: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
    pub priority: Option<ContactPriority>,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
    pub ticket_id: String,
}

pub async fn faq() -> Json<Vec<FaqEntry>> {
    Json(vec![
        FaqEntry {
            question: "How do I submit a complaint?",
            answer: "Log into your account, open the dashboard, and use the \
                     Submit Complaint form. Fill in the required information \
                     and submit.",
        },
        FaqEntry {
            question: "How can I track my complaint status?",
            answer: "Open the Complaint Tracker section in your dashboard and \
                     enter your complaint ID to see the current status and \
                     updates.",
        },
        FaqEntry {
            question: "What information do I need to provide when submitting a complaint?",
            answer: "A title, description, category, location, and any \
                     relevant images or documents.",
        },
        FaqEntry {
            question: "How long does it take to process a complaint?",
            answer: "Processing time varies with the type and complexity of \
                     the complaint. Status updates are delivered through the \
                     platform.",
        },
    ])
}

pub async fn guides() -> Json<Vec<Guide>> {
    Json(vec![
        Guide {
            title: "Getting Started",
            content: "Learn how to create an account and navigate the platform.",
            video_url: "https://example.com/videos/getting-started",
        },
        Guide {
            title: "Submitting Complaints",
            content: "Step-by-step guide on how to submit and track complaints.",
            video_url: "https://example.com/videos/submitting-complaints",
        },
        Guide {
            title: "Managing Your Profile",
            content: "Learn how to update your profile and manage your settings.",
            video_url: "https://example.com/videos/managing-profile",
        },
    ])
}

pub async fn contact(
    guard: Guarded<CitizenOnly>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ContactResponse>> {
    request.validate()?;

    let ticket_id = Uuid::new_v4().simple().to_string();
    tracing::info!(
        user_id = %guard.principal.id,
        ticket_id,
        subject = %request.subject,
        priority = ?request.priority,
        "Support request received"
    );

    Ok(Json(ContactResponse {
        message: "Support request submitted successfully".to_string(),
        ticket_id,
    }))
}
