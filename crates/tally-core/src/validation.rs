use serde::{Deserialize, Serialize};

use crate::draft::{Draft, DraftField};

/// Ordered error messages for a draft. Empty means the draft may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    messages: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// A result holding a single message, e.g. a persistence failure.
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl IntoIterator for ValidationResult {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Check every required field of `draft`, in [`DraftField::ALL`] order.
pub fn validate(draft: &Draft) -> ValidationResult {
    let mut result = ValidationResult::new();
    for field in DraftField::ALL {
        if is_blank(draft.get(*field)) {
            result.push(field.required_message());
        }
    }
    result
}
