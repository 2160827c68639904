//! Complaint lifecycle: submission, scoped listing, status updates.

use crate::domain::{
    Complaint, ComplaintFilter, CreateComplaintInput, Role, StringUuid, UpdateComplaintStatusInput,
};
use crate::error::{AppError, Result};
use crate::middleware::Principal;
use crate::policy::{authorize_complaint_access, ComplaintScope};
use crate::repository::{ComplaintRepository, UserRepository};
use crate::service::NotificationService;
use std::sync::Arc;
use validator::Validate;

pub struct ComplaintService<C: ComplaintRepository, U: UserRepository> {
    complaints: Arc<C>,
    notifier: Arc<NotificationService<U>>,
}

impl<C: ComplaintRepository, U: UserRepository> ComplaintService<C, U> {
    pub fn new(complaints: Arc<C>, notifier: Arc<NotificationService<U>>) -> Self {
        Self {
            complaints,
            notifier,
        }
    }

    /// Submit a complaint. The owner is always the calling principal and the
    /// status always starts at `pending`; neither is client-supplied.
    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateComplaintInput,
    ) -> Result<Complaint> {
        input.validate()?;

        let complaint = self.complaints.create(principal.id, &input).await?;

        self.notifier
            .notify(
                principal.id,
                "Complaint submitted",
                &format!("Your complaint \"{}\" has been received.", complaint.title),
            )
            .await;

        tracing::info!(complaint_id = %complaint.id, citizen_id = %principal.id, "Complaint created");
        Ok(complaint)
    }

    /// List complaints visible to the principal. The ownership scope is
    /// derived here and intersected with any client filters.
    pub async fn list(
        &self,
        principal: &Principal,
        filter: &ComplaintFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Complaint>, i64)> {
        let scope = ComplaintScope::for_principal(principal);

        let complaints = self.complaints.list(scope, filter, limit, offset).await?;
        let total = self.complaints.count(scope, filter).await?;

        Ok((complaints, total))
    }

    pub async fn get(&self, principal: &Principal, id: StringUuid) -> Result<Complaint> {
        let complaint = self
            .complaints
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", id)))?;

        authorize_complaint_access(principal, &complaint)?;
        Ok(complaint)
    }

    /// Update status and optionally reassign. An agency can only touch
    /// complaints assigned to its own agency, and can only reassign within
    /// its own agency; admin tier has no such restriction.
    pub async fn update_status(
        &self,
        principal: &Principal,
        id: StringUuid,
        input: UpdateComplaintStatusInput,
    ) -> Result<Complaint> {
        let complaint = self
            .complaints
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Complaint {} not found", id)))?;

        authorize_complaint_access(principal, &complaint)?;

        let assigned_to = input.assigned_to.map(StringUuid::from);
        if principal.role == Role::Agency {
            if let Some(target) = assigned_to {
                if principal.agency_id != Some(target) {
                    return Err(AppError::Forbidden(
                        "Agencies can only assign complaints to their own agency".to_string(),
                    ));
                }
            }
        }

        let updated = self
            .complaints
            .update_status(id, input.status, assigned_to)
            .await?;

        self.notifier
            .notify(
                updated.citizen_id,
                "Complaint status updated",
                &format!(
                    "Your complaint \"{}\" is now {}.",
                    updated.title,
                    updated.status.as_str()
                ),
            )
            .await;

        if let Some(agency_id) = updated.assigned_to {
            self.notifier
                .notify_agency(
                    agency_id,
                    "Complaint assigned",
                    &format!(
                        "Complaint \"{}\" is assigned to your agency ({}).",
                        updated.title,
                        updated.status.as_str()
                    ),
                )
                .await;
        }

        tracing::info!(
            complaint_id = %updated.id,
            status = %updated.status.as_str(),
            updated_by = %principal.id,
            "Complaint status updated"
        );
        Ok(updated)
    }
}
