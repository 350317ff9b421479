use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::{Child, Group, Organization};

/// Repository for organizations
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Insert a new organization
    async fn create_organization(&self, organization: &Organization) -> RepositoryResult<()>;

    /// All organizations, oldest first
    async fn list_organizations(&self) -> RepositoryResult<Vec<Organization>>;

    /// Find an organization by its ID
    async fn find_organization(&self, id: Uuid) -> RepositoryResult<Option<Organization>>;
}

/// Repository for groups and their membership
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Insert a new group
    ///
    /// Fails with `NotFound` if the organization does not exist.
    async fn create_group(&self, group: &Group) -> RepositoryResult<()>;

    /// Find a group by its ID
    async fn find_group(&self, id: Uuid) -> RepositoryResult<Option<Group>>;

    /// Groups of an organization, oldest first
    ///
    /// Fails with `NotFound` if the organization does not exist.
    async fn list_groups_by_organization(&self, organization_id: Uuid) -> RepositoryResult<Vec<Group>>;

    /// Move the given children into a group and return its full roster
    ///
    /// Either every child is moved or none is.
    async fn link_children(&self, group_id: Uuid, child_ids: &[Uuid]) -> RepositoryResult<Vec<Child>>;
}

/// Repository for children
#[async_trait]
pub trait ChildRepository: Send + Sync {
    /// Insert a new child
    ///
    /// Fails with `NotFound` if a group is given and does not exist.
    async fn create_child(&self, child: &Child) -> RepositoryResult<()>;

    /// Children currently in a group, oldest first
    async fn list_children_by_group(&self, group_id: Uuid) -> RepositoryResult<Vec<Child>>;
}
