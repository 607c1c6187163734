use async_trait::async_trait;
use tally_core::category::{Category, CreateCategory};
use tally_db::{Db, DbError};

use crate::{CategoryService, ServiceError};

/// Local implementation backed by direct SQLite access.
#[derive(Clone)]
pub struct LocalService {
    db: Db,
}

impl LocalService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => ServiceError::NotFound(msg),
            DbError::InvalidInput(msg) => ServiceError::InvalidInput(msg),
            DbError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> ServiceError {
    ServiceError::Internal(e.to_string())
}

#[async_trait]
impl CategoryService for LocalService {
    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        let db = self.db.clone();
        let categories = tokio::task::spawn_blocking(move || db.list_categories())
            .await
            .map_err(join_error)??;
        tracing::debug!(count = categories.len(), "listed categories");
        Ok(categories)
    }

    async fn create_category(&self, input: &CreateCategory) -> Result<Category, ServiceError> {
        let db = self.db.clone();
        let input = input.clone();
        let category = tokio::task::spawn_blocking(move || db.create_category(&input))
            .await
            .map_err(join_error)??;
        tracing::info!(id = %category.id, name = %category.name, "created category");
        Ok(category)
    }
}
