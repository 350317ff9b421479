use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::{RepositoryError, RepositoryResult};
use crate::domain::{Phone, TelegramId};

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of every repository trait
///
/// Uses runtime-checked SQLx queries, so building does not need a live
/// database. Schema lives in `migrations/`. Each repository trait is
/// implemented in its own `postgres_*_repository` module.
pub struct PostgresStore {
    pub(super) pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgresStore
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    pub(super) async fn exists(&self, table: &str, id: Uuid) -> RepositoryResult<bool> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", table);
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check existence", e))
    }
}

pub(super) fn db_error(context: &str, e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(format!("{}: {}", context, e))
}

/// Maps constraint violations on writes to domain-level errors
pub(super) fn write_error(e: sqlx::Error, context: &str, missing: &str, duplicate: &str) -> RepositoryError {
    if let Some(db) = e.as_database_error() {
        match db.code().as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => return RepositoryError::NotFound(missing.to_string()),
            Some(UNIQUE_VIOLATION) => return RepositoryError::Conflict(duplicate.to_string()),
            _ => {}
        }
    }
    db_error(context, e)
}

pub(super) fn phone_from_db(raw: &str) -> RepositoryResult<Phone> {
    Phone::new(raw).map_err(|e| RepositoryError::Database(format!("Invalid phone from database: {}", e)))
}

pub(super) fn tg_id_from_db(raw: Option<i64>) -> RepositoryResult<Option<TelegramId>> {
    raw.map(TelegramId::new)
        .transpose()
        .map_err(|e| RepositoryError::Database(format!("Invalid telegram id from database: {}", e)))
}
