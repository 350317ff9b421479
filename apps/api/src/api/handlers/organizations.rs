use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::parse_id;
use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathParam};
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::repositories::OrganizationRepository;
use crate::domain::Organization;

/// Request body for creating an organization
#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
}

/// Create a new organization
///
/// POST /organizations
pub async fn create_organization(
    State(state): State<AppState>,
    auth: JwtAuth,
    JsonBody(req): JsonBody<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    auth.require_employee()?;

    let organization = Organization::new(req.name)?;
    state.store.create_organization(&organization).await?;

    tracing::info!(organization_id = %organization.id, "organization created");
    Ok((StatusCode::CREATED, Json(organization)))
}

/// List all organizations
///
/// GET /organizations
pub async fn get_organizations(
    State(state): State<AppState>,
    _auth: JwtAuth,
) -> Result<Json<Vec<Organization>>, ApiError> {
    Ok(Json(state.store.list_organizations().await?))
}

/// Get an organization by ID
///
/// GET /organizations/:organization_id
pub async fn get_organization(
    State(state): State<AppState>,
    _auth: JwtAuth,
    PathParam(organization_id): PathParam<String>,
) -> Result<Json<Organization>, ApiError> {
    let id = parse_id("Organization", &organization_id)?;
    let organization = state
        .store
        .find_organization(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Organization {} not found", id)))?;

    Ok(Json(organization))
}
