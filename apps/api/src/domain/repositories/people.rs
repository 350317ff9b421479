use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult};
use crate::domain::{Employee, Parent, Phone, TelegramId};

/// Repository for parents
#[async_trait]
pub trait ParentRepository: Send + Sync {
    /// Insert a new parent
    ///
    /// Fails with `NotFound` for an unknown child and `Conflict` if the
    /// telegram id already belongs to another parent.
    async fn create_parent(&self, parent: &Parent) -> RepositoryResult<()>;

    /// Find a parent by telegram id
    async fn find_parent_by_tg_id(&self, tg_id: TelegramId) -> RepositoryResult<Option<Parent>>;

    /// Parents linked to a child
    ///
    /// Fails with `NotFound` if the child does not exist.
    async fn list_parents_by_child(&self, child_id: Uuid) -> RepositoryResult<Vec<Parent>>;
}

/// Repository for employees
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Insert a new employee
    ///
    /// Fails with `NotFound` for an unknown organization and `Conflict` if
    /// the telegram id already belongs to another employee.
    async fn create_employee(&self, employee: &Employee) -> RepositoryResult<()>;

    /// Find an employee by telegram id
    async fn find_employee_by_tg_id(&self, tg_id: TelegramId) -> RepositoryResult<Option<Employee>>;
}

/// Records touched by a merge, after the merge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub parents: Vec<Parent>,
    pub employees: Vec<Employee>,
}

/// Checks the merge rules for one table; returns whether a row matches
///
/// A telegram id identifies at most one record per table, so a phone shared
/// by several records of the same kind cannot be merged.
pub(crate) fn check_merge<'a, I>(rows: I, phone: &Phone, tg_id: TelegramId, kind: &str) -> RepositoryResult<bool>
where
    I: Iterator<Item = (&'a Phone, Option<TelegramId>)>,
{
    let mut matched = 0;
    for (row_phone, row_tg) in rows {
        if row_phone == phone {
            matched += 1;
            if let Some(existing) = row_tg.filter(|existing| *existing != tg_id) {
                return Err(RepositoryError::Conflict(format!(
                    "{} with phone {} is already bound to telegram id {}",
                    kind, phone, existing
                )));
            }
        } else if row_tg == Some(tg_id) {
            return Err(RepositoryError::Conflict(format!(
                "Telegram id {} already belongs to another {}",
                tg_id,
                kind.to_lowercase()
            )));
        }
    }

    if matched > 1 {
        return Err(RepositoryError::Conflict(format!(
            "{} records of kind {} share phone {}",
            matched,
            kind.to_lowercase(),
            phone
        )));
    }
    Ok(matched == 1)
}

/// Cross-cutting operations over parents and employees
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Bind a telegram id to every parent and employee with this phone
    ///
    /// # Rules
    /// - Records without a telegram id receive `tg_id`
    /// - Records already bound to `tg_id` are left as they are
    /// - A record bound to a different id, `tg_id` being held by a record
    ///   with another phone, or several parents (or several employees)
    ///   sharing the phone fails with `Conflict`
    /// - No record with this phone fails with `NotFound`
    ///
    /// The merge is atomic: on failure nothing is changed.
    async fn merge_tg_id_by_phone(&self, phone: &Phone, tg_id: TelegramId) -> RepositoryResult<MergeOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone(raw: &str) -> Phone {
        Phone::new(raw).unwrap()
    }

    fn tg(id: i64) -> TelegramId {
        TelegramId::new(id).unwrap()
    }

    #[test]
    fn single_unbound_row_matches() {
        let rows = [(phone("5551234"), None), (phone("5550000"), Some(tg(1)))];
        let matched = check_merge(rows.iter().map(|(p, t)| (p, *t)), &phone("5551234"), tg(42), "Parent");
        assert!(matched.unwrap());
    }

    #[test]
    fn no_row_with_phone() {
        let rows = [(phone("5550000"), None)];
        let matched = check_merge(rows.iter().map(|(p, t)| (p, *t)), &phone("5551234"), tg(42), "Parent");
        assert!(!matched.unwrap());
    }

    #[test]
    fn shared_phone_conflicts() {
        let rows = [(phone("5551234"), None), (phone("555-1234"), None)];
        let result = check_merge(rows.iter().map(|(p, t)| (p, *t)), &phone("5551234"), tg(77), "Parent");
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[test]
    fn bound_to_other_id_conflicts() {
        let rows = [(phone("5551234"), Some(tg(9)))];
        let result = check_merge(rows.iter().map(|(p, t)| (p, *t)), &phone("5551234"), tg(42), "Employee");
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }
}
