//! PostgreSQL document collections: one `jsonb` document per row, keyed by id.

use async_trait::async_trait;
use lazy_static::lazy_static;
use serde_json::Value;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use super::document::DocumentCollection;
use crate::kernel::{ensure_active, StoreError};

lazy_static! {
    // Table names are interpolated into SQL, so only plain identifiers are allowed.
    static ref TABLE_NAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").unwrap();
}

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgCollection {
    pool: PgPool,
    table: String,
}

impl PgCollection {
    /// Fails when `table` is not a plain lower-case identifier.
    pub fn new(pool: PgPool, table: &str) -> Result<Self, StoreError> {
        if !TABLE_NAME_REGEX.is_match(table) {
            return Err(StoreError::Backend(format!(
                "'{}' is not a valid table name",
                table
            )));
        }
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    /// Creates the backing table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, document JSONB NOT NULL)",
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }
}

fn map_insert_error(error: sqlx::Error, id: &str) -> StoreError {
    match &error {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            StoreError::Duplicate(id.to_string())
        }
        _ => StoreError::Database(error),
    }
}

#[async_trait]
impl DocumentCollection for PgCollection {
    fn name(&self) -> &str {
        &self.table
    }

    async fn insert_one(
        &self,
        id: &str,
        document: Value,
        cancel: &CancellationToken,
    ) -> Result<(), StoreError> {
        ensure_active(cancel)?;
        let sql = format!("INSERT INTO {} (id, document) VALUES ($1, $2)", self.table);
        sqlx::query(&sql)
            .bind(id)
            .bind(document)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, id))?;
        Ok(())
    }

    async fn replace_one(
        &self,
        id: &str,
        document: Value,
        cancel: &CancellationToken,
    ) -> Result<bool, StoreError> {
        ensure_active(cancel)?;
        let sql = format!("UPDATE {} SET document = $2 WHERE id = $1", self.table);
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(document)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_one(&self, id: &str, cancel: &CancellationToken) -> Result<bool, StoreError> {
        ensure_active(cancel)?;
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_one(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, StoreError> {
        ensure_active(cancel)?;
        let sql = format!("SELECT document FROM {} WHERE id = $1", self.table);
        let document = sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(document)
    }

    async fn find_one_by(
        &self,
        field: &str,
        value: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, StoreError> {
        ensure_active(cancel)?;
        let sql = format!(
            "SELECT document FROM {} WHERE document ->> $1 = $2 ORDER BY id LIMIT 1",
            self.table
        );
        let document = sqlx::query_scalar::<_, Value>(&sql)
            .bind(field)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(document)
    }

    async fn find_all(&self, cancel: &CancellationToken) -> Result<Vec<Value>, StoreError> {
        ensure_active(cancel)?;
        let sql = format!("SELECT document FROM {} ORDER BY id", self.table);
        let documents = sqlx::query_scalar::<_, Value>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/todoflow_test")
            .unwrap()
    }

    #[actix_rt::test]
    async fn test_table_names_are_restricted() {
        assert!(PgCollection::new(lazy_pool(), "todos").is_ok());
        assert!(PgCollection::new(lazy_pool(), "user_documents").is_ok());
        assert!(PgCollection::new(lazy_pool(), "todos; DROP TABLE users").is_err());
        assert!(PgCollection::new(lazy_pool(), "Todos").is_err());
        assert!(PgCollection::new(lazy_pool(), "").is_err());
    }

    #[actix_rt::test]
    async fn test_cancelled_call_does_not_reach_the_database() {
        let collection = PgCollection::new(lazy_pool(), "todos").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = collection.find_all(&cancel).await.unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));
    }
}
