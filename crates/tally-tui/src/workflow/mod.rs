//! The category screen as a state machine.
//!
//! [`Workflow::update`] is the only way state changes: it takes an [`Action`]
//! from the user or from a settled persistence call, and returns the
//! [`Effect`]s the runtime must carry out. Nothing here performs I/O.

mod form;
mod list;
mod picker;

use std::sync::Arc;

use tally_core::{Category, CreateCategory, Draft, Palette, ValidationResult};
use tally_service::ServiceError;

pub use form::{CreationForm, FormPhase, Settlement, SubmitOutcome, SubmitTicket};
pub use list::CategoryList;
pub use picker::{Picker, PickerKind};

/// The single overlay currently accepting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    List,
    Form,
    IconPicker,
    ColorPicker,
}

/// What sits above the list. Pickers live inside the form, so a picker can
/// never be open without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Closed,
    Form(CreationForm),
}

/// When the list is re-fetched after the form closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Only after a category was created. Cancelling costs nothing.
    #[default]
    OnSuccess,
    /// After every close of the form, created or cancelled.
    OnEveryClose,
}

#[derive(Debug, Clone)]
pub enum Action {
    // -- List --
    NewCategory,
    MoveCursor(i32),
    SelectRow,
    Refresh,
    Close,

    // -- Form --
    SetName(String),
    TypeChar(char),
    Backspace,
    OpenPicker(PickerKind),
    Save,
    CancelForm,

    // -- Picker --
    MovePicker(i32),
    CommitPicker,
    SelectOption(String),
    DismissPicker,

    // -- Settlements --
    Refreshed {
        generation: u64,
        result: Result<Vec<Category>, ServiceError>,
    },
    Settled {
        ticket: SubmitTicket,
        result: Result<Category, ServiceError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCategories { generation: u64 },
    CreateCategory { ticket: SubmitTicket, input: CreateCategory },
    /// A row was chosen on the list.
    CategoryChosen(Category),
    /// The close gesture on the list.
    CloseRequested,
}

/// An open picker as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerView {
    pub kind: PickerKind,
    pub highlighted: Option<String>,
}

/// Immutable view of the workflow after a transition.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub surface: Surface,
    pub categories: Arc<Vec<Category>>,
    pub cursor: Option<usize>,
    pub loaded: bool,
    pub fetch_error: Option<String>,
    /// `None` while the form is closed.
    pub draft: Option<Draft>,
    pub errors: ValidationResult,
    pub submitting: bool,
    pub picker: Option<PickerView>,
    pub palette: Arc<Palette>,
}

impl Snapshot {
    pub fn form_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn icon_picker_open(&self) -> bool {
        self.surface == Surface::IconPicker
    }

    pub fn color_picker_open(&self) -> bool {
        self.surface == Surface::ColorPicker
    }

    pub fn options(&self, kind: PickerKind) -> &[String] {
        match kind {
            PickerKind::Icon => &self.palette.icons,
            PickerKind::Color => &self.palette.colors,
        }
    }

    pub fn selected(&self) -> Option<&Category> {
        self.categories.get(self.cursor?)
    }
}

#[derive(Debug, Clone)]
pub struct Workflow {
    list: CategoryList,
    overlay: Overlay,
    palette: Arc<Palette>,
    refresh_policy: RefreshPolicy,
    next_ticket: u64,
}

impl Workflow {
    pub fn new(palette: Palette, refresh_policy: RefreshPolicy) -> Self {
        Self {
            list: CategoryList::new(),
            overlay: Overlay::Closed,
            palette: Arc::new(palette),
            refresh_policy,
            next_ticket: 0,
        }
    }

    /// The fetch issued when the screen first appears.
    pub fn mount(&mut self) -> Vec<Effect> {
        vec![self.refresh()]
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn form(&self) -> Option<&CreationForm> {
        match &self.overlay {
            Overlay::Form(form) => Some(form),
            Overlay::Closed => None,
        }
    }

    fn form_mut(&mut self) -> Option<&mut CreationForm> {
        match &mut self.overlay {
            Overlay::Form(form) => Some(form),
            Overlay::Closed => None,
        }
    }

    pub fn surface(&self) -> Surface {
        match &self.overlay {
            Overlay::Closed => Surface::List,
            Overlay::Form(form) => match form.picker().map(|p| p.kind()) {
                None => Surface::Form,
                Some(PickerKind::Icon) => Surface::IconPicker,
                Some(PickerKind::Color) => Surface::ColorPicker,
            },
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.form().is_some_and(|f| f.is_submitting())
    }

    pub fn snapshot(&self) -> Snapshot {
        let form = self.form();
        Snapshot {
            surface: self.surface(),
            categories: Arc::clone(self.list.categories()),
            cursor: self.list.cursor(),
            loaded: self.list.is_loaded(),
            fetch_error: self.list.fetch_error().map(String::from),
            draft: form.map(|f| f.draft().clone()),
            errors: form.map(|f| f.errors().clone()).unwrap_or_default(),
            submitting: self.is_submitting(),
            picker: form.and_then(|f| f.picker()).map(|p| PickerView {
                kind: p.kind(),
                highlighted: p.highlighted().map(String::from),
            }),
            palette: Arc::clone(&self.palette),
        }
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Refreshed { generation, result } => {
                self.list.apply(generation, result);
                Vec::new()
            }
            Action::Settled { ticket, result } => self.settle(ticket, result),
            Action::Refresh => vec![self.refresh()],
            other => match self.surface() {
                Surface::List => self.on_list(other),
                Surface::Form => self.on_form(other),
                Surface::IconPicker | Surface::ColorPicker => self.on_picker(other),
            },
        }
    }

    fn refresh(&mut self) -> Effect {
        Effect::FetchCategories {
            generation: self.list.request_refresh(),
        }
    }

    fn on_list(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::NewCategory => {
                tracing::debug!("opening creation form");
                self.overlay = Overlay::Form(CreationForm::new());
                Vec::new()
            }
            Action::MoveCursor(delta) => {
                self.list.move_cursor(delta);
                Vec::new()
            }
            Action::SelectRow => self
                .list
                .selected()
                .map(|c| vec![Effect::CategoryChosen(c.clone())])
                .unwrap_or_default(),
            Action::Close => vec![Effect::CloseRequested],
            other => ignored(Surface::List, other),
        }
    }

    fn on_form(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::SetName(name) => {
                self.edit(|f| f.set_name(name));
                Vec::new()
            }
            Action::TypeChar(c) => {
                self.edit(|f| f.push_char(c));
                Vec::new()
            }
            Action::Backspace => {
                self.edit(|f| f.backspace());
                Vec::new()
            }
            Action::OpenPicker(kind) => {
                self.edit(|f| f.open_picker(kind));
                Vec::new()
            }
            Action::Save => self.save(),
            Action::CancelForm | Action::Close => self.cancel(),
            other => ignored(Surface::Form, other),
        }
    }

    fn on_picker(&mut self, action: Action) -> Vec<Effect> {
        let surface = self.surface();
        let palette = Arc::clone(&self.palette);
        let Some(form) = self.form_mut() else {
            return Vec::new();
        };
        match action {
            Action::MovePicker(delta) => {
                if let Some(picker) = form.picker_mut() {
                    let options = match picker.kind() {
                        PickerKind::Icon => &palette.icons,
                        PickerKind::Color => &palette.colors,
                    };
                    picker.move_by(options, delta);
                }
            }
            Action::CommitPicker => {
                form.commit_picker();
            }
            Action::SelectOption(value) => {
                form.select(value);
            }
            Action::DismissPicker | Action::CancelForm | Action::Close => {
                form.dismiss_picker();
            }
            other => return ignored(surface, other),
        }
        Vec::new()
    }

    fn edit(&mut self, f: impl FnOnce(&mut CreationForm) -> bool) {
        if let Some(form) = self.form_mut() {
            if !f(form) {
                tracing::debug!("form is locked while submitting; edit ignored");
            }
        }
    }

    fn save(&mut self) -> Vec<Effect> {
        let ticket = SubmitTicket(self.next_ticket + 1);
        let Some(form) = self.form_mut() else {
            return Vec::new();
        };
        match form.submit(ticket) {
            SubmitOutcome::Started(input) => {
                self.next_ticket = ticket.0;
                tracing::debug!(ticket = ticket.0, "submitting category");
                vec![Effect::CreateCategory { ticket, input }]
            }
            SubmitOutcome::Invalid => {
                tracing::debug!("draft failed validation");
                Vec::new()
            }
            SubmitOutcome::Ignored => {
                tracing::debug!("save ignored; a submission is already in flight");
                Vec::new()
            }
        }
    }

    fn cancel(&mut self) -> Vec<Effect> {
        if self.is_submitting() {
            tracing::debug!("cancel ignored; waiting for the submission to settle");
            return Vec::new();
        }
        tracing::debug!("creation form cancelled");
        self.overlay = Overlay::Closed;
        match self.refresh_policy {
            RefreshPolicy::OnEveryClose => vec![self.refresh()],
            RefreshPolicy::OnSuccess => Vec::new(),
        }
    }

    fn settle(&mut self, ticket: SubmitTicket, result: Result<Category, ServiceError>) -> Vec<Effect> {
        let Some(form) = self.form_mut() else {
            tracing::warn!(ticket = ticket.0, "settlement arrived with the form closed");
            return Vec::new();
        };
        match form.settle(ticket, result) {
            Settlement::Created(category) => {
                tracing::info!(id = %category.id, "category created; closing form");
                self.overlay = Overlay::Closed;
                vec![self.refresh()]
            }
            Settlement::Failed => Vec::new(),
            Settlement::Stale => {
                tracing::warn!(ticket = ticket.0, "discarding stale settlement");
                Vec::new()
            }
        }
    }
}

fn ignored(surface: Surface, action: Action) -> Vec<Effect> {
    tracing::debug!(?surface, ?action, "action not accepted by foreground surface");
    Vec::new()
}
