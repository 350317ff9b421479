use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::parse_id;
use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathParam};
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::repositories::ChildRepository;
use crate::domain::Child;

/// Request body for enrolling a child
#[derive(Debug, Deserialize)]
pub struct CreateChildRequest {
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub group_id: Option<Uuid>,
}

/// Enroll a child, optionally straight into a group
///
/// POST /child
pub async fn create_child(
    State(state): State<AppState>,
    auth: JwtAuth,
    JsonBody(req): JsonBody<CreateChildRequest>,
) -> Result<(StatusCode, Json<Child>), ApiError> {
    auth.require_employee()?;

    let child = Child::new(req.full_name, req.birth_date, req.group_id)?;
    state.store.create_child(&child).await?;

    tracing::info!(child_id = %child.id, group_id = ?child.group_id, "child created");
    Ok((StatusCode::CREATED, Json(child)))
}

/// List the children in a group
///
/// GET /child/:group_id
pub async fn get_children_by_group_id(
    State(state): State<AppState>,
    _auth: JwtAuth,
    PathParam(group_id): PathParam<String>,
) -> Result<Json<Vec<Child>>, ApiError> {
    let id = parse_id("Group", &group_id)?;
    Ok(Json(state.store.list_children_by_group(id).await?))
}
