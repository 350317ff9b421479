use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::parse_tg_id;
use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathParam};
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::repositories::EmployeeRepository;
use crate::domain::{Employee, Phone, TelegramId};

/// Request body for creating an employee
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub organization_id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub tg_id: Option<i64>,
}

/// Hire an employee into an organization
///
/// POST /employee
pub async fn create_employee(
    State(state): State<AppState>,
    auth: JwtAuth,
    JsonBody(req): JsonBody<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    auth.require_employee()?;

    let phone = Phone::new(&req.phone)?;
    let tg_id = req.tg_id.map(TelegramId::new).transpose()?;
    let employee = Employee::new(req.organization_id, req.full_name, phone, tg_id)?;
    state.store.create_employee(&employee).await?;

    tracing::info!(employee_id = %employee.id, organization_id = %employee.organization_id, "employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Get an employee by telegram id
///
/// GET /employee/:tg_id
pub async fn get_employee_by_tg_id(
    State(state): State<AppState>,
    _auth: JwtAuth,
    PathParam(tg_id): PathParam<String>,
) -> Result<Json<Employee>, ApiError> {
    let tg_id = parse_tg_id(&tg_id)?;
    let employee = state
        .store
        .find_employee_by_tg_id(tg_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Employee with telegram id {} not found", tg_id)))?;

    Ok(Json(employee))
}
