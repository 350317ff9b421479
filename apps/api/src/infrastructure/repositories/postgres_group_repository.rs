use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::postgres_store::{db_error, write_error, PostgresStore};
use crate::domain::repositories::{ChildRepository, GroupRepository, RepositoryError, RepositoryResult};
use crate::domain::{Child, Group};

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<GroupRow> for Group {
    fn from(r: GroupRow) -> Self {
        Self {
            id: r.id,
            organization_id: r.organization_id,
            name: r.name,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl GroupRepository for PostgresStore {
    async fn create_group(&self, group: &Group) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO child_groups (id, organization_id, name, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(group.id)
        .bind(group.organization_id)
        .bind(&group.name)
        .bind(group.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            write_error(
                e,
                "Failed to create group",
                &format!("Organization {}", group.organization_id),
                "Group already exists",
            )
        })?;

        Ok(())
    }

    async fn find_group(&self, id: Uuid) -> RepositoryResult<Option<Group>> {
        let row = sqlx::query_as::<_, GroupRow>(
            "SELECT id, organization_id, name, created_at FROM child_groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find group", e))?;

        Ok(row.map(Group::from))
    }

    async fn list_groups_by_organization(&self, organization_id: Uuid) -> RepositoryResult<Vec<Group>> {
        if !self.exists("organizations", organization_id).await? {
            return Err(RepositoryError::NotFound(format!("Organization {}", organization_id)));
        }

        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, organization_id, name, created_at
            FROM child_groups
            WHERE organization_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list groups", e))?;

        Ok(rows.into_iter().map(Group::from).collect())
    }

    async fn link_children(&self, group_id: Uuid, child_ids: &[Uuid]) -> RepositoryResult<Vec<Child>> {
        let mut ids = child_ids.to_vec();
        ids.sort();
        ids.dedup();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        let group_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM child_groups WHERE id = $1)")
                .bind(group_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to find group", e))?;
        if !group_exists {
            return Err(RepositoryError::NotFound(format!("Group {}", group_id)));
        }

        let updated = sqlx::query("UPDATE children SET group_id = $1 WHERE id = ANY($2)")
            .bind(group_id)
            .bind(ids.as_slice())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to link children", e))?
            .rows_affected();
        if updated != ids.len() as u64 {
            // dropping the transaction rolls back the partial update
            return Err(RepositoryError::NotFound("One or more children".to_string()));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))?;

        self.list_children_by_group(group_id).await
    }
}
