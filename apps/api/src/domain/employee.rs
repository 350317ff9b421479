use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::errors::{required, DomainError};
use super::value_objects::{Phone, TelegramId};

/// A staff member of an organization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub full_name: String,
    pub phone: Phone,
    pub tg_id: Option<TelegramId>,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn new(
        organization_id: Uuid,
        full_name: String,
        phone: Phone,
        tg_id: Option<TelegramId>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::new_v4(),
            organization_id,
            full_name: required("full_name", full_name)?,
            phone,
            tg_id,
            created_at: Utc::now(),
        })
    }
}
