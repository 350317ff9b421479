use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::postgres_store::{db_error, PostgresStore};
use crate::domain::repositories::{OrganizationRepository, RepositoryResult};
use crate::domain::Organization;

#[derive(sqlx::FromRow)]
struct OrganizationRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<OrganizationRow> for Organization {
    fn from(r: OrganizationRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl OrganizationRepository for PostgresStore {
    async fn create_organization(&self, organization: &Organization) -> RepositoryResult<()> {
        sqlx::query("INSERT INTO organizations (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(organization.id)
            .bind(&organization.name)
            .bind(organization.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create organization", e))?;

        Ok(())
    }

    async fn list_organizations(&self) -> RepositoryResult<Vec<Organization>> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, name, created_at FROM organizations ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list organizations", e))?;

        Ok(rows.into_iter().map(Organization::from).collect())
    }

    async fn find_organization(&self, id: Uuid) -> RepositoryResult<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, name, created_at FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find organization", e))?;

        Ok(row.map(Organization::from))
    }
}
