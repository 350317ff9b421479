use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::errors::{required, DomainError};

/// A child enrolled with the daycare
///
/// `group_id` is empty until the child is linked to a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Child {
    pub id: Uuid,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub group_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Child {
    pub fn new(
        full_name: String,
        birth_date: Option<NaiveDate>,
        group_id: Option<Uuid>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::new_v4(),
            full_name: required("full_name", full_name)?,
            birth_date,
            group_id,
            created_at: Utc::now(),
        })
    }
}
