use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Postgres;
use uuid::Uuid;

use super::postgres_store::{db_error, phone_from_db, tg_id_from_db, write_error, PostgresStore};
use crate::domain::repositories::{EmployeeRepository, RepositoryError, RepositoryResult};
use crate::domain::{Employee, TelegramId};

const EMPLOYEE_SELECT: &str = r#"
    SELECT id, organization_id, full_name, phone, tg_id, created_at
    FROM employees
"#;

impl PostgresStore {
    pub(super) async fn fetch_employees<T>(&self, filter: &str, value: T) -> RepositoryResult<Vec<Employee>>
    where
        T: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + 'static,
    {
        let sql = format!("{} WHERE {} ORDER BY created_at", EMPLOYEE_SELECT, filter);
        sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load employees", e))?
            .into_iter()
            .map(Employee::try_from)
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: Uuid,
    organization_id: Uuid,
    full_name: String,
    phone: String,
    tg_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = RepositoryError;

    fn try_from(r: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            organization_id: r.organization_id,
            full_name: r.full_name,
            phone: phone_from_db(&r.phone)?,
            tg_id: tg_id_from_db(r.tg_id)?,
            created_at: r.created_at,
        })
    }
}

#[async_trait]
impl EmployeeRepository for PostgresStore {
    async fn create_employee(&self, employee: &Employee) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employees (id, organization_id, full_name, phone, tg_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(employee.id)
        .bind(employee.organization_id)
        .bind(&employee.full_name)
        .bind(employee.phone.as_str())
        .bind(employee.tg_id.map(|id| id.value()))
        .bind(employee.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            write_error(
                e,
                "Failed to create employee",
                &format!("Organization {}", employee.organization_id),
                "Telegram id already belongs to an employee",
            )
        })?;

        Ok(())
    }

    async fn find_employee_by_tg_id(&self, tg_id: TelegramId) -> RepositoryResult<Option<Employee>> {
        let mut employees = self.fetch_employees("tg_id = $1", tg_id.value()).await?;
        Ok(employees.pop())
    }
}
