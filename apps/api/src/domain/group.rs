use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::errors::{required, DomainError};

/// A group of children inside an organization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Creates a new Group
    ///
    /// The organization is not checked here; the repository rejects
    /// groups pointing at an unknown organization.
    pub fn new(organization_id: Uuid, name: String) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::new_v4(),
            organization_id,
            name: required("name", name)?,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_organization() {
        let org_id = Uuid::new_v4();
        let group = Group::new(org_id, "Ladybirds".to_string()).unwrap();
        assert_eq!(group.organization_id, org_id);
        assert_eq!(group.name, "Ladybirds");
    }

    #[test]
    fn empty_name_rejected() {
        assert!(Group::new(Uuid::new_v4(), String::new()).is_err());
    }
}
