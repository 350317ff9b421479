use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathParam};
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::repositories::UserRepository;
use crate::domain::{Employee, Parent, Phone, TelegramId};

/// Request body for merging a telegram account into existing records
#[derive(Debug, Deserialize)]
pub struct MergeUserRequest {
    pub tg_id: i64,
}

/// Records bound to the telegram id after the merge
#[derive(Debug, Serialize)]
pub struct MergeUserResponse {
    pub phone: Phone,
    pub tg_id: TelegramId,
    pub parents: Vec<Parent>,
    pub employees: Vec<Employee>,
}

/// Bind a telegram id to every parent and employee registered with a phone
///
/// POST /user/:phone
pub async fn try_merge_user_by_phone(
    State(state): State<AppState>,
    auth: JwtAuth,
    PathParam(phone): PathParam<String>,
    JsonBody(req): JsonBody<MergeUserRequest>,
) -> Result<Json<MergeUserResponse>, ApiError> {
    auth.require_employee()?;

    let phone = Phone::new(&phone)?;
    let tg_id = TelegramId::new(req.tg_id)?;
    let outcome = state.store.merge_tg_id_by_phone(&phone, tg_id).await?;

    tracing::info!(
        %phone,
        %tg_id,
        parents = outcome.parents.len(),
        employees = outcome.employees.len(),
        "telegram id merged by phone"
    );
    Ok(Json(MergeUserResponse {
        phone,
        tg_id,
        parents: outcome.parents,
        employees: outcome.employees,
    }))
}
