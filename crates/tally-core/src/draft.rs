use std::fmt;

use serde::{Deserialize, Serialize};

/// The three fields of a category being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Name,
    Color,
    Icon,
}

impl DraftField {
    /// Display and validation order.
    pub const ALL: &[DraftField] = &[DraftField::Name, DraftField::Color, DraftField::Icon];

    pub fn display_name(&self) -> &'static str {
        match self {
            DraftField::Name => "Title",
            DraftField::Color => "Color",
            DraftField::Icon => "Icon",
        }
    }

    pub fn required_message(&self) -> &'static str {
        match self {
            DraftField::Name => "Title is required",
            DraftField::Color => "Color is required",
            DraftField::Icon => "Icon is required",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A partially-filled category. Every field stays `None` until the user
/// provides it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl Draft {
    pub fn get(&self, field: DraftField) -> Option<&str> {
        match field {
            DraftField::Name => self.name.as_deref(),
            DraftField::Color => self.color.as_deref(),
            DraftField::Icon => self.icon.as_deref(),
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = Some(value.into());
        match field {
            DraftField::Name => self.name = value,
            DraftField::Color => self.color = value,
            DraftField::Icon => self.icon = value,
        }
    }

    /// True when no field has been touched.
    pub fn is_blank(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.icon.is_none()
    }
}
