use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::errors::{required, DomainError};
use super::value_objects::{Phone, TelegramId};

/// A parent or guardian of one or more children
///
/// # Invariants
/// - Name is never empty
/// - `child_ids` holds no duplicates
/// - `tg_id` is set at creation or later by merging on phone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parent {
    pub id: Uuid,
    pub full_name: String,
    pub phone: Phone,
    pub tg_id: Option<TelegramId>,
    pub child_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Parent {
    pub fn new(
        full_name: String,
        phone: Phone,
        tg_id: Option<TelegramId>,
        child_ids: Vec<Uuid>,
    ) -> Result<Self, DomainError> {
        let mut unique = Vec::with_capacity(child_ids.len());
        for id in child_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            full_name: required("full_name", full_name)?,
            phone,
            tg_id,
            child_ids: unique,
            created_at: Utc::now(),
        })
    }
}
