use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{parse_id, parse_tg_id};
use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathParam};
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::repositories::ParentRepository;
use crate::domain::{Parent, Phone, TelegramId};

/// Request body for creating a parent
#[derive(Debug, Deserialize)]
pub struct CreateParentRequest {
    pub full_name: String,
    pub phone: String,
    pub tg_id: Option<i64>,
    #[serde(default)]
    pub child_ids: Vec<Uuid>,
}

/// Register a parent
///
/// POST /parents
pub async fn create_parent(
    State(state): State<AppState>,
    auth: JwtAuth,
    JsonBody(req): JsonBody<CreateParentRequest>,
) -> Result<(StatusCode, Json<Parent>), ApiError> {
    auth.require_employee()?;

    let phone = Phone::new(&req.phone)?;
    let tg_id = req.tg_id.map(TelegramId::new).transpose()?;
    let parent = Parent::new(req.full_name, phone, tg_id, req.child_ids)?;
    state.store.create_parent(&parent).await?;

    tracing::info!(parent_id = %parent.id, children = parent.child_ids.len(), "parent created");
    Ok((StatusCode::CREATED, Json(parent)))
}

/// Get a parent by telegram id
///
/// GET /parents/:tg_id
pub async fn get_parent_by_tg_id(
    State(state): State<AppState>,
    _auth: JwtAuth,
    PathParam(tg_id): PathParam<String>,
) -> Result<Json<Parent>, ApiError> {
    let tg_id = parse_tg_id(&tg_id)?;
    let parent = state
        .store
        .find_parent_by_tg_id(tg_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Parent with telegram id {} not found", tg_id)))?;

    Ok(Json(parent))
}

/// List the parents of a child
///
/// GET /parents/child/:child_id
pub async fn get_parents_by_child_id(
    State(state): State<AppState>,
    _auth: JwtAuth,
    PathParam(child_id): PathParam<String>,
) -> Result<Json<Vec<Parent>>, ApiError> {
    let id = parse_id("Child", &child_id)?;
    Ok(Json(state.store.list_parents_by_child(id).await?))
}
