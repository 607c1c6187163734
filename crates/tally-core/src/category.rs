use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::Draft;
use crate::validation::{validate, ValidationResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a category. Only obtainable from a [`Draft`] that
/// validates cleanly, or directly by callers that own all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl TryFrom<&Draft> for CreateCategory {
    type Error = ValidationResult;

    fn try_from(draft: &Draft) -> Result<Self, Self::Error> {
        let result = validate(draft);
        if !result.is_empty() {
            return Err(result);
        }
        match (&draft.name, &draft.color, &draft.icon) {
            (Some(name), Some(color), Some(icon)) => Ok(CreateCategory {
                name: name.trim().to_string(),
                color: color.trim().to_string(),
                icon: icon.trim().to_string(),
            }),
            // validate() already reported any absent field
            _ => Err(result),
        }
    }
}
