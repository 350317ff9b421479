use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Postgres;
use uuid::Uuid;

use super::postgres_store::{db_error, phone_from_db, tg_id_from_db, write_error, PostgresStore};
use crate::domain::repositories::{ParentRepository, RepositoryError, RepositoryResult};
use crate::domain::{Parent, TelegramId};

const PARENT_SELECT: &str = r#"
    SELECT
        p.id, p.full_name, p.phone, p.tg_id, p.created_at,
        COALESCE(
            array_agg(pc.child_id ORDER BY pc.position) FILTER (WHERE pc.child_id IS NOT NULL),
            '{}'
        ) AS child_ids
    FROM parents p
    LEFT JOIN parent_children pc ON pc.parent_id = p.id
"#;

impl PostgresStore {
    pub(super) async fn fetch_parents<T>(&self, filter: &str, value: T) -> RepositoryResult<Vec<Parent>>
    where
        T: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + 'static,
    {
        let sql = format!(
            "{} WHERE {} GROUP BY p.id ORDER BY p.created_at",
            PARENT_SELECT, filter
        );
        sqlx::query_as::<_, ParentRow>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load parents", e))?
            .into_iter()
            .map(Parent::try_from)
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct ParentRow {
    id: Uuid,
    full_name: String,
    phone: String,
    tg_id: Option<i64>,
    child_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ParentRow> for Parent {
    type Error = RepositoryError;

    fn try_from(r: ParentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            full_name: r.full_name,
            phone: phone_from_db(&r.phone)?,
            tg_id: tg_id_from_db(r.tg_id)?,
            child_ids: r.child_ids,
            created_at: r.created_at,
        })
    }
}

#[async_trait]
impl ParentRepository for PostgresStore {
    async fn create_parent(&self, parent: &Parent) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO parents (id, full_name, phone, tg_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(parent.id)
        .bind(&parent.full_name)
        .bind(parent.phone.as_str())
        .bind(parent.tg_id.map(|id| id.value()))
        .bind(parent.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            write_error(
                e,
                "Failed to create parent",
                "Parent",
                "Telegram id already belongs to a parent",
            )
        })?;

        for (position, child_id) in parent.child_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO parent_children (parent_id, child_id, position) VALUES ($1, $2, $3)",
            )
            .bind(parent.id)
            .bind(*child_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    "Failed to link child to parent",
                    &format!("Child {}", child_id),
                    "Child already linked",
                )
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))
    }

    async fn find_parent_by_tg_id(&self, tg_id: TelegramId) -> RepositoryResult<Option<Parent>> {
        let mut parents = self.fetch_parents("p.tg_id = $1", tg_id.value()).await?;
        Ok(parents.pop())
    }

    async fn list_parents_by_child(&self, child_id: Uuid) -> RepositoryResult<Vec<Parent>> {
        if !self.exists("children", child_id).await? {
            return Err(RepositoryError::NotFound(format!("Child {}", child_id)));
        }

        self.fetch_parents(
            "p.id IN (SELECT parent_id FROM parent_children WHERE child_id = $1)",
            child_id,
        )
        .await
    }
}
