//! ConfigRepository trait definition.
//!
//! Flat key/value store for runtime overrides. Keys are unique; writes are
//! upserts.

use parley_types::config::ConfigEntry;
use parley_types::error::RepositoryError;

/// Repository trait for runtime config overrides.
///
/// Implementations live in parley-infra (e.g., `SqliteConfigRepository`).
pub trait ConfigRepository: Send + Sync {
    /// Get the override stored under `key`, if any.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<ConfigEntry>, RepositoryError>> + Send;

    /// Insert or replace the override and refresh its `updated_at`.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove an override. Returns true if a row was deleted.
    fn delete(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Every stored override, ordered by key.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ConfigEntry>, RepositoryError>> + Send;
}
