use async_trait::async_trait;

use super::postgres_store::{db_error, phone_from_db, tg_id_from_db, write_error, PostgresStore};
use crate::domain::repositories::people::check_merge;
use crate::domain::repositories::{MergeOutcome, RepositoryError, RepositoryResult, UserRepository};
use crate::domain::{Phone, TelegramId};

#[async_trait]
impl UserRepository for PostgresStore {
    async fn merge_tg_id_by_phone(&self, phone: &Phone, tg_id: TelegramId) -> RepositoryResult<MergeOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        let mut matched = false;
        for (table, kind) in [("parents", "Parent"), ("employees", "Employee")] {
            let sql = format!(
                "SELECT phone, tg_id FROM {} WHERE phone = $1 OR tg_id = $2 FOR UPDATE",
                table
            );
            let rows = sqlx::query_as::<_, (String, Option<i64>)>(&sql)
                .bind(phone.as_str())
                .bind(tg_id.value())
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to load users by phone", e))?
                .into_iter()
                .map(|(row_phone, row_tg)| -> RepositoryResult<(Phone, Option<TelegramId>)> {
                    Ok((phone_from_db(&row_phone)?, tg_id_from_db(row_tg)?))
                })
                .collect::<RepositoryResult<Vec<_>>>()?;

            if check_merge(rows.iter().map(|(p, t)| (p, *t)), phone, tg_id, kind)? {
                matched = true;
                let sql = format!(
                    "UPDATE {} SET tg_id = $2 WHERE phone = $1 AND tg_id IS NULL",
                    table
                );
                sqlx::query(&sql)
                    .bind(phone.as_str())
                    .bind(tg_id.value())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        write_error(
                            e,
                            "Failed to merge telegram id",
                            kind,
                            "Telegram id already bound to another user",
                        )
                    })?;
            }
        }

        if !matched {
            return Err(RepositoryError::NotFound(format!("User with phone {}", phone)));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit transaction", e))?;

        Ok(MergeOutcome {
            parents: self.fetch_parents("p.phone = $1", phone.as_str().to_string()).await?,
            employees: self.fetch_employees("phone = $1", phone.as_str().to_string()).await?,
        })
    }
}
