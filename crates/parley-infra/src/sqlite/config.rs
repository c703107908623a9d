//! SQLite runtime-config repository implementation.

use parley_core::config::repository::ConfigRepository;
use parley_types::config::ConfigEntry;
use parley_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, now, parse_datetime};

/// SQLite-backed implementation of `ConfigRepository`.
pub struct SqliteConfigRepository {
    pool: DatabasePool,
}

impl SqliteConfigRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ConfigRow {
    key: String,
    value: String,
    updated_at: String,
}

impl ConfigRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            key: row.try_get("key")?,
            value: row.try_get("value")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_entry(self) -> Result<ConfigEntry, RepositoryError> {
        Ok(ConfigEntry {
            key: self.key,
            value: self.value,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl ConfigRepository for SqliteConfigRepository {
    async fn get(&self, key: &str) -> Result<Option<ConfigEntry>, RepositoryError> {
        let row = sqlx::query("SELECT key, value, updated_at FROM config WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let config_row =
                    ConfigRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(config_row.into_entry()?))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO config (key, value, updated_at)
               VALUES (?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(value)
        .bind(format_datetime(&now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM config WHERE key = ?")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<ConfigEntry>, RepositoryError> {
        let rows = sqlx::query("SELECT key, value, updated_at FROM config ORDER BY key")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let config_row =
                ConfigRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            entries.push(config_row.into_entry()?);
        }
        Ok(entries)
    }
}
