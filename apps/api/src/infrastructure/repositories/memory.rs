use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::{
    ChildRepository, EmployeeRepository, GroupRepository, MergeOutcome, OrganizationRepository,
    ParentRepository, RepositoryError, RepositoryResult, UserRepository,
};
use crate::domain::repositories::people::check_merge;
use crate::domain::{Child, Employee, Group, Organization, Parent, Phone, TelegramId};

#[derive(Debug, Default)]
struct Tables {
    organizations: Vec<Organization>,
    groups: Vec<Group>,
    children: Vec<Child>,
    parents: Vec<Parent>,
    employees: Vec<Employee>,
}

impl Tables {
    fn require_organization(&self, id: Uuid) -> RepositoryResult<()> {
        if self.organizations.iter().any(|o| o.id == id) {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(format!("Organization {}", id)))
        }
    }

    fn require_group(&self, id: Uuid) -> RepositoryResult<()> {
        if self.groups.iter().any(|g| g.id == id) {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(format!("Group {}", id)))
        }
    }

    fn require_child(&self, id: Uuid) -> RepositoryResult<()> {
        if self.children.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(format!("Child {}", id)))
        }
    }
}

/// In-memory store used when no database is configured, and by tests
///
/// Rows are kept in insertion order, so listings come back oldest first
/// like the Postgres adapter's `ORDER BY created_at`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizationRepository for MemoryStore {
    async fn create_organization(&self, organization: &Organization) -> RepositoryResult<()> {
        self.tables.write().await.organizations.push(organization.clone());
        Ok(())
    }

    async fn list_organizations(&self) -> RepositoryResult<Vec<Organization>> {
        Ok(self.tables.read().await.organizations.clone())
    }

    async fn find_organization(&self, id: Uuid) -> RepositoryResult<Option<Organization>> {
        let tables = self.tables.read().await;
        Ok(tables.organizations.iter().find(|o| o.id == id).cloned())
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn create_group(&self, group: &Group) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        tables.require_organization(group.organization_id)?;
        tables.groups.push(group.clone());
        Ok(())
    }

    async fn find_group(&self, id: Uuid) -> RepositoryResult<Option<Group>> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn list_groups_by_organization(&self, organization_id: Uuid) -> RepositoryResult<Vec<Group>> {
        let tables = self.tables.read().await;
        tables.require_organization(organization_id)?;
        Ok(tables
            .groups
            .iter()
            .filter(|g| g.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn link_children(&self, group_id: Uuid, child_ids: &[Uuid]) -> RepositoryResult<Vec<Child>> {
        let mut tables = self.tables.write().await;
        tables.require_group(group_id)?;
        for id in child_ids {
            tables.require_child(*id)?;
        }

        for child in tables.children.iter_mut() {
            if child_ids.contains(&child.id) {
                child.group_id = Some(group_id);
            }
        }

        Ok(tables
            .children
            .iter()
            .filter(|c| c.group_id == Some(group_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ChildRepository for MemoryStore {
    async fn create_child(&self, child: &Child) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(group_id) = child.group_id {
            tables.require_group(group_id)?;
        }
        tables.children.push(child.clone());
        Ok(())
    }

    async fn list_children_by_group(&self, group_id: Uuid) -> RepositoryResult<Vec<Child>> {
        let tables = self.tables.read().await;
        tables.require_group(group_id)?;
        Ok(tables
            .children
            .iter()
            .filter(|c| c.group_id == Some(group_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ParentRepository for MemoryStore {
    async fn create_parent(&self, parent: &Parent) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        for id in &parent.child_ids {
            tables.require_child(*id)?;
        }
        if let Some(tg_id) = parent.tg_id {
            if tables.parents.iter().any(|p| p.tg_id == Some(tg_id)) {
                return Err(RepositoryError::Conflict(format!(
                    "Telegram id {} already belongs to a parent",
                    tg_id
                )));
            }
        }
        tables.parents.push(parent.clone());
        Ok(())
    }

    async fn find_parent_by_tg_id(&self, tg_id: TelegramId) -> RepositoryResult<Option<Parent>> {
        let tables = self.tables.read().await;
        Ok(tables.parents.iter().find(|p| p.tg_id == Some(tg_id)).cloned())
    }

    async fn list_parents_by_child(&self, child_id: Uuid) -> RepositoryResult<Vec<Parent>> {
        let tables = self.tables.read().await;
        tables.require_child(child_id)?;
        Ok(tables
            .parents
            .iter()
            .filter(|p| p.child_ids.contains(&child_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn create_employee(&self, employee: &Employee) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        tables.require_organization(employee.organization_id)?;
        if let Some(tg_id) = employee.tg_id {
            if tables.employees.iter().any(|e| e.tg_id == Some(tg_id)) {
                return Err(RepositoryError::Conflict(format!(
                    "Telegram id {} already belongs to an employee",
                    tg_id
                )));
            }
        }
        tables.employees.push(employee.clone());
        Ok(())
    }

    async fn find_employee_by_tg_id(&self, tg_id: TelegramId) -> RepositoryResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.iter().find(|e| e.tg_id == Some(tg_id)).cloned())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn merge_tg_id_by_phone(&self, phone: &Phone, tg_id: TelegramId) -> RepositoryResult<MergeOutcome> {
        let mut tables = self.tables.write().await;

        let parents_match = check_merge(
            tables.parents.iter().map(|p| (&p.phone, p.tg_id)),
            phone,
            tg_id,
            "Parent",
        )?;
        let employees_match = check_merge(
            tables.employees.iter().map(|e| (&e.phone, e.tg_id)),
            phone,
            tg_id,
            "Employee",
        )?;
        if !parents_match && !employees_match {
            return Err(RepositoryError::NotFound(format!("User with phone {}", phone)));
        }

        let mut outcome = MergeOutcome {
            parents: Vec::new(),
            employees: Vec::new(),
        };
        if let Some(parent) = tables.parents.iter_mut().find(|p| &p.phone == phone) {
            parent.tg_id = Some(tg_id);
            outcome.parents.push(parent.clone());
        }
        if let Some(employee) = tables.employees.iter_mut().find(|e| &e.phone == phone) {
            employee.tg_id = Some(tg_id);
            outcome.employees.push(employee.clone());
        }

        Ok(outcome)
    }
}
