//! Complaint endpoints.

use crate::api::{PaginatedResponse, SuccessResponse};
use crate::domain::{
    Complaint, ComplaintFilter, CreateComplaintInput, StringUuid, UpdateComplaintStatusInput,
};
use crate::error::Result;
use crate::middleware::Guarded;
use crate::policy::{AgencyOrAdmin, AnyRole, CitizenOnly};
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

// Query-string fields are listed flat: serde(flatten) over numeric fields
// does not survive urlencoded deserialization.
#[derive(Debug, Deserialize)]
pub struct ComplaintListQuery {
    pub status: Option<crate::domain::ComplaintStatus>,
    pub category: Option<String>,
    #[serde(
        default = "crate::api::default_limit",
        deserialize_with = "crate::api::deserialize_limit"
    )]
    pub limit: i64,
    #[serde(default, deserialize_with = "crate::api::deserialize_offset")]
    pub offset: i64,
}

impl ComplaintListQuery {
    fn filter(&self) -> ComplaintFilter {
        ComplaintFilter {
            status: self.status,
            category: self.category.clone(),
        }
    }
}

pub async fn create<S: HasServices>(
    State(state): State<S>,
    guard: Guarded<CitizenOnly>,
    Json(input): Json<CreateComplaintInput>,
) -> Result<impl IntoResponse> {
    let complaint = state
        .complaint_service()
        .create(&guard.principal, input)
        .await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(complaint))))
}

pub async fn list<S: HasServices>(
    State(state): State<S>,
    guard: Guarded<AnyRole>,
    Query(query): Query<ComplaintListQuery>,
) -> Result<Json<PaginatedResponse<Complaint>>> {
    let (complaints, total) = state
        .complaint_service()
        .list(&guard.principal, &query.filter(), query.limit, query.offset)
        .await?;

    Ok(Json(PaginatedResponse::new(
        complaints,
        query.limit,
        query.offset,
        total,
    )))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    guard: Guarded<AnyRole>,
    Path(id): Path<StringUuid>,
) -> Result<Json<SuccessResponse<Complaint>>> {
    let complaint = state.complaint_service().get(&guard.principal, id).await?;
    Ok(Json(SuccessResponse::new(complaint)))
}

pub async fn update_status<S: HasServices>(
    State(state): State<S>,
    guard: Guarded<AgencyOrAdmin>,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateComplaintStatusInput>,
) -> Result<Json<SuccessResponse<Complaint>>> {
    let complaint = state
        .complaint_service()
        .update_status(&guard.principal, id, input)
        .await?;
    Ok(Json(SuccessResponse::new(complaint)))
}
