use tally_core::{Category, CreateCategory, Draft, DraftField, TallyError, ValidationResult};
use tally_service::ServiceError;

use super::picker::{Picker, PickerKind};

/// Identifies one persistence call. Only the ticket of the submission in
/// flight is accepted back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmitTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting(SubmitTicket),
    /// Editing with errors on display.
    Error,
}

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission is already in flight.
    Ignored,
    /// Validation failed; nothing was sent.
    Invalid,
    Started(CreateCategory),
}

/// Result of applying a persistence settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The ticket does not belong to the submission in flight.
    Stale,
    Created(Category),
    Failed,
}

/// The creation form while it is on screen. Closing the form drops it,
/// which discards the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationForm {
    draft: Draft,
    phase: FormPhase,
    errors: ValidationResult,
    picker: Option<Picker>,
}

impl Default for CreationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CreationForm {
    pub fn new() -> Self {
        Self {
            draft: Draft::default(),
            phase: FormPhase::Editing,
            errors: ValidationResult::new(),
            picker: None,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn picker(&self) -> Option<&Picker> {
        self.picker.as_ref()
    }

    pub(crate) fn picker_mut(&mut self) -> Option<&mut Picker> {
        self.picker.as_mut()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting(_))
    }

    /// Field edits are locked while a submission is in flight.
    fn editable(&self) -> bool {
        !self.is_submitting()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        if !self.editable() {
            return false;
        }
        self.draft.set(DraftField::Name, name);
        true
    }

    pub fn push_char(&mut self, c: char) -> bool {
        if !self.editable() {
            return false;
        }
        self.draft.name.get_or_insert_with(String::new).push(c);
        true
    }

    pub fn backspace(&mut self) -> bool {
        if !self.editable() {
            return false;
        }
        if let Some(name) = self.draft.name.as_mut() {
            name.pop();
        }
        true
    }

    pub fn open_picker(&mut self, kind: PickerKind) -> bool {
        if !self.editable() || self.picker.is_some() {
            return false;
        }
        self.picker = Some(Picker::open(kind, self.draft.get(kind.field())));
        true
    }

    /// Commit `value` into the open picker's field and close the picker.
    pub fn select(&mut self, value: impl Into<String>) -> bool {
        match self.picker.take() {
            Some(picker) => {
                self.draft.set(picker.kind().field(), value);
                true
            }
            None => false,
        }
    }

    /// Commit the highlighted value. With nothing highlighted the picker
    /// closes and the draft is left alone.
    pub fn commit_picker(&mut self) -> bool {
        match self.picker.as_ref().and_then(|p| p.highlighted()).map(String::from) {
            Some(value) => self.select(value),
            None => self.picker.take().is_some(),
        }
    }

    pub fn dismiss_picker(&mut self) -> bool {
        self.picker.take().is_some()
    }

    /// Validate and, when clean, enter `Submitting` under `ticket`.
    pub fn submit(&mut self, ticket: SubmitTicket) -> SubmitOutcome {
        if self.is_submitting() {
            return SubmitOutcome::Ignored;
        }
        match CreateCategory::try_from(&self.draft) {
            Ok(input) => {
                self.errors = ValidationResult::new();
                self.phase = FormPhase::Submitting(ticket);
                SubmitOutcome::Started(input)
            }
            Err(errors) => {
                self.errors = TallyError::Validation(errors).messages();
                self.phase = FormPhase::Error;
                SubmitOutcome::Invalid
            }
        }
    }

    /// Apply the outcome of the persistence call for `ticket`. On failure the
    /// draft is kept so the user can retry.
    pub fn settle(
        &mut self,
        ticket: SubmitTicket,
        result: Result<Category, ServiceError>,
    ) -> Settlement {
        if self.phase != FormPhase::Submitting(ticket) {
            return Settlement::Stale;
        }
        match result {
            Ok(category) => {
                self.phase = FormPhase::Editing;
                Settlement::Created(category)
            }
            Err(e) => {
                match e.message() {
                    Some(message) => {
                        self.errors = TallyError::Persistence(message.to_string()).messages();
                        self.phase = FormPhase::Error;
                    }
                    None => {
                        self.errors = ValidationResult::new();
                        self.phase = FormPhase::Editing;
                    }
                }
                Settlement::Failed
            }
        }
    }
}
