use async_trait::async_trait;
use tally_core::category::{Category, CreateCategory};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// The failure's own message, without the kind prefix. `None` when the
    /// backend gave no text.
    pub fn message(&self) -> Option<&str> {
        let msg = match self {
            ServiceError::NotFound(m)
            | ServiceError::InvalidInput(m)
            | ServiceError::Conflict(m)
            | ServiceError::Internal(m) => m.as_str(),
        };
        if msg.trim().is_empty() {
            None
        } else {
            Some(msg)
        }
    }
}

/// Persistence collaborator for categories.
///
/// The TUI programs against this trait; `LocalService` wraps a SQLite
/// database.
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// The full collection, in display order.
    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError>;

    async fn create_category(&self, input: &CreateCategory) -> Result<Category, ServiceError>;
}
