//! Database context: one entry point for the repositories.

use std::path::Path;

use super::migrations::run_migrations;
use super::pool::{AsyncSqlitePool, DieselError};
use super::seen::DieselSeenStore;
use super::tracking::DieselTrackingRepository;

/// Owns the connection factory and hands out repositories.
///
/// ```ignore
/// let ctx = DbContext::from_url(&settings.database_url());
/// ctx.migrate().await?;
/// let stats = load_stats(&ctx.seen()).await?;
/// ```
#[derive(Clone)]
pub struct DbContext {
    pool: AsyncSqlitePool,
}

impl DbContext {
    pub fn from_url(database_url: &str) -> Self {
        Self {
            pool: AsyncSqlitePool::new(database_url),
        }
    }

    pub fn from_path(db_path: &Path) -> Self {
        Self {
            pool: AsyncSqlitePool::from_path(db_path),
        }
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<Vec<String>, DieselError> {
        run_migrations(self.pool.database_url()).await
    }

    pub fn seen(&self) -> DieselSeenStore {
        DieselSeenStore::new(self.pool.clone())
    }

    pub fn tracking(&self) -> DieselTrackingRepository {
        DieselTrackingRepository::new(self.pool.clone())
    }
}
