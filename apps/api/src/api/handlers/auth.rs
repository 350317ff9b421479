use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::{ApiError, AuthError};
use crate::api::extract::QueryParams;
use crate::api::state::AppState;
use crate::auth::jwt::{create_token, Role};
use crate::domain::repositories::{EmployeeRepository, ParentRepository};
use crate::domain::TelegramId;

/// Query string for login
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub tg_id: i64,
}

/// Response from successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub user_id: Uuid,
}

/// Login with a telegram id
///
/// Employees take precedence over parents when both share the id.
///
/// GET /login?tg_id=<id>
pub async fn login(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LoginQuery>,
) -> Result<Json<LoginResponse>, ApiError> {
    let tg_id = TelegramId::new(query.tg_id)
        .map_err(|_| AuthError::unauthorized("Invalid credentials"))?;

    let (user_id, role) = if let Some(employee) = state.store.find_employee_by_tg_id(tg_id).await? {
        (employee.id, Role::Employee)
    } else if let Some(parent) = state.store.find_parent_by_tg_id(tg_id).await? {
        (parent.id, Role::Parent)
    } else {
        return Err(AuthError::unauthorized("Invalid credentials").into());
    };

    let token = create_token(user_id, role, &state.jwt_secret)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    tracing::info!(user_id = %user_id, %role, "user logged in");
    Ok(Json(LoginResponse {
        token,
        role,
        user_id,
    }))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
