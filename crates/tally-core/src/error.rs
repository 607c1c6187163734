use thiserror::Error;

use crate::validation::ValidationResult;

/// The two ways a creation attempt can fail. Both are recoverable and share
/// one display slot in the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    #[error("validation failed: {}", .0.messages().join(", "))]
    Validation(ValidationResult),

    #[error("{0}")]
    Persistence(String),
}

impl TallyError {
    /// Messages to show in the form's error slot.
    pub fn messages(&self) -> ValidationResult {
        match self {
            TallyError::Validation(result) => result.clone(),
            TallyError::Persistence(message) => ValidationResult::single(message.clone()),
        }
    }
}
