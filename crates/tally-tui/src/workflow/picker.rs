use std::fmt;

use tally_core::DraftField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerKind {
    Icon,
    Color,
}

impl PickerKind {
    /// The draft field a commit writes to.
    pub fn field(&self) -> DraftField {
        match self {
            PickerKind::Icon => DraftField::Icon,
            PickerKind::Color => DraftField::Color,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PickerKind::Icon => "Icon",
            PickerKind::Color => "Color",
        }
    }
}

impl fmt::Display for PickerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An open picker overlay. Its existence is the "open" flag; dropping it
/// closes the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    kind: PickerKind,
    highlighted: Option<String>,
}

impl Picker {
    /// Open with the draft's current value pre-selected.
    pub fn open(kind: PickerKind, current: Option<&str>) -> Self {
        Self {
            kind,
            highlighted: current.map(String::from),
        }
    }

    pub fn kind(&self) -> PickerKind {
        self.kind
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn highlighted_index(&self, options: &[String]) -> Option<usize> {
        let current = self.highlighted.as_deref()?;
        options.iter().position(|o| o == current)
    }

    /// Move the highlight through `options`, clamping at both ends. A value
    /// that is not among the options restarts from the first entry.
    pub fn move_by(&mut self, options: &[String], delta: i32) {
        if options.is_empty() {
            return;
        }
        let next = match self.highlighted_index(options) {
            None => 0,
            Some(idx) => {
                let last = options.len() as i64 - 1;
                (idx as i64 + delta as i64).clamp(0, last) as usize
            }
        };
        self.highlighted = Some(options[next].clone());
    }

    pub fn highlight(&mut self, value: impl Into<String>) {
        self.highlighted = Some(value.into());
    }
}
