use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::postgres_store::{db_error, write_error, PostgresStore};
use crate::domain::repositories::{ChildRepository, RepositoryError, RepositoryResult};
use crate::domain::Child;

const CHILD_SELECT: &str = r#"
    SELECT id, full_name, birth_date, group_id, created_at
    FROM children
"#;

#[derive(sqlx::FromRow)]
struct ChildRow {
    id: Uuid,
    full_name: String,
    birth_date: Option<NaiveDate>,
    group_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<ChildRow> for Child {
    fn from(r: ChildRow) -> Self {
        Self {
            id: r.id,
            full_name: r.full_name,
            birth_date: r.birth_date,
            group_id: r.group_id,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl ChildRepository for PostgresStore {
    async fn create_child(&self, child: &Child) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO children (id, full_name, birth_date, group_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(child.id)
        .bind(&child.full_name)
        .bind(child.birth_date)
        .bind(child.group_id)
        .bind(child.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let group = child
                .group_id
                .map(|id| format!("Group {}", id))
                .unwrap_or_else(|| "Group".to_string());
            write_error(e, "Failed to create child", &group, "Child already exists")
        })?;

        Ok(())
    }

    async fn list_children_by_group(&self, group_id: Uuid) -> RepositoryResult<Vec<Child>> {
        if !self.exists("child_groups", group_id).await? {
            return Err(RepositoryError::NotFound(format!("Group {}", group_id)));
        }

        let sql = format!("{} WHERE group_id = $1 ORDER BY created_at", CHILD_SELECT);
        let rows = sqlx::query_as::<_, ChildRow>(&sql)
            .bind(group_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list children", e))?;

        Ok(rows.into_iter().map(Child::from).collect())
    }
}
