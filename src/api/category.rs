//! Category endpoints. Writes are restricted to the admin tier.

use crate::api::{MessageResponse, SuccessResponse};
use crate::domain::{Category, CreateCategoryInput, StringUuid, UpdateCategoryInput};
use crate::error::Result;
use crate::middleware::Guarded;
use crate::policy::{AdminOrSuperAdmin, AnyRole};
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CategoryListQuery {
    pub agency_id: Option<StringUuid>,
}

pub async fn create<S: HasServices>(
    State(state): State<S>,
    _guard: Guarded<AdminOrSuperAdmin>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<impl IntoResponse> {
    let category = state.category_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(category))))
}

pub async fn list<S: HasServices>(
    State(state): State<S>,
    _guard: Guarded<AnyRole>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<SuccessResponse<Vec<Category>>>> {
    let categories = state.category_service().list(query.agency_id).await?;
    Ok(Json(SuccessResponse::new(categories)))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    _guard: Guarded<AnyRole>,
    Path(id): Path<StringUuid>,
) -> Result<Json<SuccessResponse<Category>>> {
    let category = state.category_service().get(id).await?;
    Ok(Json(SuccessResponse::new(category)))
}

pub async fn update<S: HasServices>(
    State(state): State<S>,
    _guard: Guarded<AdminOrSuperAdmin>,
    Path(id): Path<StringUuid>,
    Json(input): Json<UpdateCategoryInput>,
) -> Result<Json<SuccessResponse<Category>>> {
    let category = state.category_service().update(id, input).await?;
    Ok(Json(SuccessResponse::new(category)))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    _guard: Guarded<AdminOrSuperAdmin>,
    Path(id): Path<StringUuid>,
) -> Result<Json<MessageResponse>> {
    state.category_service().delete(id).await?;
    Ok(Json(MessageResponse::new("Category deleted")))
}
