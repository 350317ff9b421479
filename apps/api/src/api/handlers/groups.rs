use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::parse_id;
use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathParam};
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::repositories::GroupRepository;
use crate::domain::{Child, Group};

/// Request body for creating a group
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub organization_id: Uuid,
    pub name: String,
}

/// Request body for moving children into a group
#[derive(Debug, Deserialize)]
pub struct LinkChildrenRequest {
    pub group_id: Uuid,
    pub child_ids: Vec<Uuid>,
}

/// A group together with the children currently in it
#[derive(Debug, Serialize)]
pub struct GroupRosterResponse {
    pub group: Group,
    pub children: Vec<Child>,
}

/// Create a group inside an organization
///
/// POST /groups
pub async fn add_group_to_organization(
    State(state): State<AppState>,
    auth: JwtAuth,
    JsonBody(req): JsonBody<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    auth.require_employee()?;

    let group = Group::new(req.organization_id, req.name)?;
    state.store.create_group(&group).await?;

    tracing::info!(group_id = %group.id, organization_id = %group.organization_id, "group created");
    Ok((StatusCode::CREATED, Json(group)))
}

/// List the groups of an organization
///
/// GET /organizations/:organization_id/groups
pub async fn get_groups_by_organization(
    State(state): State<AppState>,
    _auth: JwtAuth,
    PathParam(organization_id): PathParam<String>,
) -> Result<Json<Vec<Group>>, ApiError> {
    let id = parse_id("Organization", &organization_id)?;
    Ok(Json(state.store.list_groups_by_organization(id).await?))
}

/// Get a group by ID
///
/// GET /groups/:group_id
pub async fn get_group(
    State(state): State<AppState>,
    _auth: JwtAuth,
    PathParam(group_id): PathParam<String>,
) -> Result<Json<Group>, ApiError> {
    let id = parse_id("Group", &group_id)?;
    let group = state
        .store
        .find_group(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Group {} not found", id)))?;

    Ok(Json(group))
}

/// Move children into a group
///
/// POST /groups/link_children
pub async fn add_children_to_group(
    State(state): State<AppState>,
    auth: JwtAuth,
    JsonBody(req): JsonBody<LinkChildrenRequest>,
) -> Result<Json<GroupRosterResponse>, ApiError> {
    auth.require_employee()?;

    if req.child_ids.is_empty() {
        return Err(ApiError::bad_request("child_ids cannot be empty"));
    }

    let group = state
        .store
        .find_group(req.group_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Group {} not found", req.group_id)))?;
    let children = state.store.link_children(group.id, &req.child_ids).await?;

    tracing::info!(group_id = %group.id, linked = req.child_ids.len(), "children linked to group");
    Ok(Json(GroupRosterResponse { group, children }))
}
