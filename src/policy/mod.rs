//! Centralized authorization policy for HTTP handlers.
//!
//! Role predicates are types consumed by the `Guarded` extractor in
//! `middleware::auth`; ownership scoping is expressed as a `ComplaintScope`
//! that the complaint repository requires on every list query, so a handler
//! cannot forget it.

use crate::domain::{Complaint, Role, StringUuid};
use crate::error::AppError;
use crate::middleware::auth::Principal;

/// A compile-time role predicate. Implementations are zero-sized markers
/// used as `Guarded<AdminOrSuperAdmin>` parameters in handler signatures.
pub trait RolePredicate: Send + Sync + 'static {
    fn allows(role: Role) -> bool;

    /// Human-readable description used in 403 messages
    fn describe() -> &'static str;
}

/// Any authenticated principal
pub struct AnyRole;

impl RolePredicate for AnyRole {
    fn allows(_role: Role) -> bool {
        true
    }
    fn describe() -> &'static str {
        "any authenticated user"
    }
}

/// Admin or super-admin
pub struct AdminOrSuperAdmin;

impl RolePredicate for AdminOrSuperAdmin {
    fn allows(role: Role) -> bool {
        role.is_admin_tier()
    }
    fn describe() -> &'static str {
        "admin or super-admin"
    }
}

/// Super-admin only
pub struct SuperAdminOnly;

impl RolePredicate for SuperAdminOnly {
    fn allows(role: Role) -> bool {
        role == Role::SuperAdmin
    }
    fn describe() -> &'static str {
        "super-admin"
    }
}

/// Agency only
pub struct AgencyOnly;

impl RolePredicate for AgencyOnly {
    fn allows(role: Role) -> bool {
        role == Role::Agency
    }
    fn describe() -> &'static str {
        "agency"
    }
}

/// Citizen only
pub struct CitizenOnly;

impl RolePredicate for CitizenOnly {
    fn allows(role: Role) -> bool {
        role == Role::Citizen
    }
    fn describe() -> &'static str {
        "citizen"
    }
}

/// Agencies and admin-tier roles (status updates, assignment)
pub struct AgencyOrAdmin;

impl RolePredicate for AgencyOrAdmin {
    fn allows(role: Role) -> bool {
        role == Role::Agency || role.is_admin_tier()
    }
    fn describe() -> &'static str {
        "agency or admin"
    }
}

/// Runtime variant of the role check, for ad-hoc role lists.
pub fn require_any(principal: &Principal, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Access denied. Insufficient permissions.".to_string(),
        ))
    }
}

/// Ownership scope applied to complaint list queries.
///
/// The repository takes this as a required argument; callers obtain it via
/// [`ComplaintScope::for_principal`], never construct `Unrestricted` from
/// request data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplaintScope {
    /// Admin tier: no ownership predicate
    Unrestricted,
    /// Citizen: `citizen_id = id`
    Citizen(StringUuid),
    /// Agency: `assigned_to = agency_id`
    Agency(StringUuid),
}

impl ComplaintScope {
    /// Derive the scope from the resolved principal.
    ///
    /// An agency principal without an agency reference can never match any
    /// complaint; the nil sentinel keeps that case closed instead of open.
    pub fn for_principal(principal: &Principal) -> Self {
        match principal.role {
            Role::Citizen => ComplaintScope::Citizen(principal.id),
            Role::Agency => {
                ComplaintScope::Agency(principal.agency_id.unwrap_or_else(StringUuid::nil))
            }
            Role::Admin | Role::SuperAdmin => ComplaintScope::Unrestricted,
        }
    }
}

/// Gate for single-complaint reads and mutations.
///
/// Citizens may only touch their own complaints; agencies only complaints
/// assigned to their agency; admin tier always passes.
pub fn authorize_complaint_access(
    principal: &Principal,
    complaint: &Complaint,
) -> Result<(), AppError> {
    match principal.role {
        Role::Admin | Role::SuperAdmin => Ok(()),
        Role::Citizen => {
            if complaint.citizen_id == principal.id {
                Ok(())
            } else {
                Err(AppError::Forbidden("Access denied.".to_string()))
            }
        }
        Role::Agency => {
            let assigned_here = match (complaint.assigned_to, principal.agency_id) {
                (Some(assigned), Some(agency)) => assigned == agency,
                _ => false,
            };
            if assigned_here {
                Ok(())
            } else {
                Err(AppError::Forbidden("Access denied.".to_string()))
            }
        }
    }
}
