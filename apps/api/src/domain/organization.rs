use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::errors::{required, DomainError};

/// A daycare operator owning groups and employing staff
///
/// # Invariants
/// - Name is trimmed and never empty
///
/// # Example
/// ```
/// use daycare_api::domain::Organization;
///
/// let org = Organization::new("  Sunny Hill  ".to_string()).expect("valid organization");
/// assert_eq!(org.name, "Sunny Hill");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(name: String) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: required("name", name)?,
            created_at: Utc::now(),
        })
    }
}
