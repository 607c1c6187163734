//! Transition tests for the pure workflow state machine.
//!
//! No runtime is involved: effects are inspected directly and settlements are
//! fed back by hand, the way the shell would after a task completes.

use chrono::Utc;
use tally_core::{Category, CreateCategory, Draft, Palette};
use tally_service::ServiceError;
use tally_tui::workflow::{
    Action, Effect, FormPhase, Overlay, PickerKind, RefreshPolicy, Surface, SubmitTicket,
    Workflow,
};

fn workflow() -> Workflow {
    Workflow::new(Palette::default(), RefreshPolicy::OnSuccess)
}

fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.into(),
        name: name.into(),
        color: "#FF0000".into(),
        icon: "cutlery".into(),
        created_at: Utc::now(),
    }
}

/// Open the form and fill in the given fields.
fn open_with(wf: &mut Workflow, name: Option<&str>, color: Option<&str>, icon: Option<&str>) {
    wf.update(Action::NewCategory);
    if let Some(name) = name {
        wf.update(Action::SetName(name.into()));
    }
    if let Some(icon) = icon {
        wf.update(Action::OpenPicker(PickerKind::Icon));
        wf.update(Action::SelectOption(icon.into()));
    }
    if let Some(color) = color {
        wf.update(Action::OpenPicker(PickerKind::Color));
        wf.update(Action::SelectOption(color.into()));
    }
}

fn expect_create(effects: &[Effect]) -> (SubmitTicket, CreateCategory) {
    match effects {
        [Effect::CreateCategory { ticket, input }] => (*ticket, input.clone()),
        other => panic!("expected a single create effect, got {other:?}"),
    }
}

fn fetches(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::FetchCategories { .. }))
        .count()
}

// ---- Opening and editing ----

#[test]
fn new_category_opens_blank_form() {
    let mut wf = workflow();
    wf.update(Action::NewCategory);
    let snap = wf.snapshot();
    assert_eq!(snap.surface, Surface::Form);
    assert_eq!(snap.draft, Some(Draft::default()));
    assert!(snap.errors.is_empty());
    assert!(!snap.submitting);
}

#[test]
fn form_stays_editing_across_many_edits_and_pickers() {
    let mut wf = workflow();
    wf.update(Action::NewCategory);
    for _ in 0..3 {
        wf.update(Action::OpenPicker(PickerKind::Icon));
        wf.update(Action::DismissPicker);
        wf.update(Action::TypeChar('a'));
    }
    wf.update(Action::OpenPicker(PickerKind::Color));
    wf.update(Action::SelectOption("#00FF00".into()));
    let form = wf.form().unwrap();
    assert_eq!(form.phase(), FormPhase::Editing);
    assert_eq!(form.draft().name.as_deref(), Some("aaa"));
}

#[test]
fn color_pick_merges_into_draft_and_closes_only_the_picker() {
    let mut wf = workflow();
    open_with(&mut wf, Some("Food"), None, Some("cutlery"));
    wf.update(Action::OpenPicker(PickerKind::Color));
    assert!(wf.snapshot().color_picker_open());

    wf.update(Action::SelectOption("#4CAF50".into()));
    let snap = wf.snapshot();
    assert_eq!(snap.surface, Surface::Form);
    assert!(!snap.color_picker_open());
    assert!(snap.form_open());
    assert_eq!(
        snap.draft,
        Some(Draft {
            name: Some("Food".into()),
            color: Some("#4CAF50".into()),
            icon: Some("cutlery".into()),
        })
    );
}

#[test]
fn reopened_picker_highlights_previous_choice() {
    let mut wf = workflow();
    open_with(&mut wf, None, None, Some("car"));
    wf.update(Action::OpenPicker(PickerKind::Icon));
    assert!(wf.snapshot().icon_picker_open());
    let picker = wf.snapshot().picker.unwrap();
    assert_eq!(picker.kind, PickerKind::Icon);
    assert_eq!(picker.highlighted.as_deref(), Some("car"));
}

#[test]
fn picker_navigation_commits_highlighted_option() {
    let mut wf = Workflow::new(
        Palette::with_overrides(None, Some(vec!["car".into(), "home".into()])),
        RefreshPolicy::OnSuccess,
    );
    wf.update(Action::NewCategory);
    wf.update(Action::OpenPicker(PickerKind::Icon));
    wf.update(Action::MovePicker(1));
    wf.update(Action::MovePicker(1));
    wf.update(Action::CommitPicker);
    assert_eq!(wf.form().unwrap().draft().icon.as_deref(), Some("home"));
    assert_eq!(wf.surface(), Surface::Form);
}

#[test]
fn dismissing_picker_keeps_draft() {
    let mut wf = workflow();
    open_with(&mut wf, None, Some("#FF0000"), None);
    wf.update(Action::OpenPicker(PickerKind::Color));
    wf.update(Action::MovePicker(3));
    wf.update(Action::DismissPicker);
    assert_eq!(wf.form().unwrap().draft().color.as_deref(), Some("#FF0000"));
    assert_eq!(wf.surface(), Surface::Form);
}

#[test]
fn close_gesture_on_picker_only_dismisses_it() {
    let mut wf = workflow();
    wf.update(Action::NewCategory);
    wf.update(Action::OpenPicker(PickerKind::Icon));
    let effects = wf.update(Action::Close);
    assert!(effects.is_empty());
    assert_eq!(wf.surface(), Surface::Form);
}

// ---- Validation ----

#[test]
fn blank_title_is_rejected_without_persistence() {
    let mut wf = workflow();
    open_with(&mut wf, Some(""), Some("#FF0000"), Some("car"));
    let effects = wf.update(Action::Save);
    assert!(effects.is_empty());
    let snap = wf.snapshot();
    assert_eq!(snap.errors.messages(), ["Title is required"]);
    assert!(!snap.submitting);
    assert_eq!(snap.surface, Surface::Form);
    assert_eq!(wf.form().unwrap().phase(), FormPhase::Error);
}

#[test]
fn empty_form_reports_every_field_in_order() {
    let mut wf = workflow();
    wf.update(Action::NewCategory);
    wf.update(Action::Save);
    assert_eq!(
        wf.snapshot().errors.messages(),
        ["Title is required", "Color is required", "Icon is required"]
    );
}

#[test]
fn errors_stay_visible_while_editing_until_next_save() {
    let mut wf = workflow();
    wf.update(Action::NewCategory);
    wf.update(Action::Save);
    wf.update(Action::TypeChar('F'));
    assert_eq!(wf.snapshot().errors.len(), 3);
    wf.update(Action::Save);
    assert_eq!(
        wf.snapshot().errors.messages(),
        ["Color is required", "Icon is required"]
    );
}

// ---- Submission ----

#[test]
fn valid_save_issues_one_create_with_trimmed_name() {
    let mut wf = workflow();
    open_with(&mut wf, Some(" Food "), Some("#FF0000"), Some("cutlery"));
    let (_, input) = expect_create(&wf.update(Action::Save));
    assert_eq!(
        input,
        CreateCategory {
            name: "Food".into(),
            color: "#FF0000".into(),
            icon: "cutlery".into(),
        }
    );
    assert!(wf.snapshot().submitting);
}

#[test]
fn double_save_issues_a_single_create() {
    let mut wf = workflow();
    open_with(&mut wf, Some("Food"), Some("#FF0000"), Some("cutlery"));
    let first = wf.update(Action::Save);
    let second = wf.update(Action::Save);
    let third = wf.update(Action::Save);
    expect_create(&first);
    assert!(second.is_empty());
    assert!(third.is_empty());
}

#[test]
fn success_closes_form_resets_draft_and_refreshes_once() {
    let mut wf = workflow();
    wf.mount();
    open_with(&mut wf, Some("Food"), Some("#FF0000"), Some("cutlery"));
    let (ticket, _) = expect_create(&wf.update(Action::Save));

    let effects = wf.update(Action::Settled {
        ticket,
        result: Ok(category("c1", "Food")),
    });
    assert_eq!(fetches(&effects), 1);
    assert_eq!(effects.len(), 1);

    let snap = wf.snapshot();
    assert_eq!(snap.surface, Surface::List);
    assert_eq!(snap.draft, None);
    assert!(!snap.submitting);

    // Opening again starts from an empty draft.
    wf.update(Action::NewCategory);
    assert_eq!(wf.snapshot().draft, Some(Draft::default()));
}

#[test]
fn failure_keeps_form_open_with_message_and_draft() {
    let mut wf = workflow();
    open_with(&mut wf, Some("Food"), Some("#FF0000"), Some("cutlery"));
    let (ticket, _) = expect_create(&wf.update(Action::Save));

    let effects = wf.update(Action::Settled {
        ticket,
        result: Err(ServiceError::Conflict(
            "a category named 'Food' already exists".into(),
        )),
    });
    assert!(effects.is_empty());

    let snap = wf.snapshot();
    assert_eq!(snap.surface, Surface::Form);
    assert!(!snap.submitting);
    assert_eq!(
        snap.errors.messages(),
        ["a category named 'Food' already exists"]
    );
    assert_eq!(
        snap.draft,
        Some(Draft {
            name: Some("Food".into()),
            color: Some("#FF0000".into()),
            icon: Some("cutlery".into()),
        })
    );
}

#[test]
fn retry_after_failure_uses_a_new_ticket() {
    let mut wf = workflow();
    open_with(&mut wf, Some("Food"), Some("#FF0000"), Some("cutlery"));
    let (first, _) = expect_create(&wf.update(Action::Save));
    wf.update(Action::Settled {
        ticket: first,
        result: Err(ServiceError::Internal("disk full".into())),
    });
    let (second, _) = expect_create(&wf.update(Action::Save));
    assert_ne!(first, second);

    // A late duplicate of the first settlement is ignored.
    wf.update(Action::Settled {
        ticket: first,
        result: Ok(category("c0", "Food")),
    });
    assert!(wf.snapshot().submitting);
}

#[test]
fn cancel_is_ignored_while_submitting() {
    let mut wf = workflow();
    open_with(&mut wf, Some("Food"), Some("#FF0000"), Some("cutlery"));
    let (ticket, _) = expect_create(&wf.update(Action::Save));
    assert!(wf.update(Action::CancelForm).is_empty());
    assert_eq!(wf.surface(), Surface::Form);

    wf.update(Action::Settled {
        ticket,
        result: Ok(category("c1", "Food")),
    });
    assert_eq!(wf.surface(), Surface::List);
}

#[test]
fn submitting_flag_is_false_after_every_settlement() {
    let outcomes: Vec<Result<Category, ServiceError>> = vec![
        Ok(category("c1", "Food")),
        Err(ServiceError::Internal("boom".into())),
        Err(ServiceError::Internal(String::new())),
    ];
    for result in outcomes {
        let mut wf = workflow();
        open_with(&mut wf, Some("Food"), Some("#FF0000"), Some("cutlery"));
        let (ticket, _) = expect_create(&wf.update(Action::Save));
        assert!(wf.snapshot().submitting);
        wf.update(Action::Settled { ticket, result });
        assert!(!wf.snapshot().submitting);
    }
}

// ---- Cancel ----

#[test]
fn cancel_discards_draft_without_refresh_or_persistence() {
    let mut wf = workflow();
    open_with(&mut wf, Some("Food"), None, None);
    let effects = wf.update(Action::CancelForm);
    assert!(effects.is_empty());
    assert!(matches!(wf.overlay(), Overlay::Closed));
    let snap = wf.snapshot();
    assert_eq!(snap.surface, Surface::List);
    assert_eq!(snap.draft, None);
    assert!(snap.errors.is_empty());
}

#[test]
fn cancel_refreshes_under_every_close_policy() {
    let mut wf = Workflow::new(Palette::default(), RefreshPolicy::OnEveryClose);
    open_with(&mut wf, Some("Food"), None, None);
    let effects = wf.update(Action::CancelForm);
    assert_eq!(fetches(&effects), 1);
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::CreateCategory { .. })));
}

#[test]
fn cancel_after_error_clears_errors() {
    let mut wf = workflow();
    wf.update(Action::NewCategory);
    wf.update(Action::Save);
    wf.update(Action::CancelForm);
    wf.update(Action::NewCategory);
    assert!(wf.snapshot().errors.is_empty());
}

// ---- List ----

#[test]
fn refresh_results_replace_collection() {
    let mut wf = workflow();
    let generation = match wf.mount().as_slice() {
        [Effect::FetchCategories { generation }] => *generation,
        other => panic!("unexpected {other:?}"),
    };
    wf.update(Action::Refreshed {
        generation,
        result: Ok(vec![category("a", "Bills"), category("b", "Food")]),
    });
    let snap = wf.snapshot();
    assert!(snap.loaded);
    assert_eq!(snap.categories.len(), 2);
    assert_eq!(snap.selected().unwrap().id, "a");
}

#[test]
fn failed_refresh_leaves_collection_unchanged() {
    let mut wf = workflow();
    wf.mount();
    wf.update(Action::Refreshed {
        generation: 1,
        result: Ok(vec![category("a", "Bills")]),
    });
    let effects = wf.update(Action::Refresh);
    assert_eq!(effects, vec![Effect::FetchCategories { generation: 2 }]);
    wf.update(Action::Refreshed {
        generation: 2,
        result: Err(ServiceError::Internal("offline".into())),
    });
    let snap = wf.snapshot();
    assert_eq!(snap.categories.len(), 1);
    assert!(snap.fetch_error.is_some());
    // Never surfaced in the form.
    wf.update(Action::NewCategory);
    assert!(wf.snapshot().errors.is_empty());
}

#[test]
fn row_selection_and_close_become_effects() {
    let mut wf = workflow();
    wf.mount();
    wf.update(Action::Refreshed {
        generation: 1,
        result: Ok(vec![category("a", "Bills"), category("b", "Food")]),
    });
    wf.update(Action::MoveCursor(1));
    match wf.update(Action::SelectRow).as_slice() {
        [Effect::CategoryChosen(c)] => assert_eq!(c.id, "b"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(wf.update(Action::Close), vec![Effect::CloseRequested]);
}

#[test]
fn select_row_on_empty_list_does_nothing() {
    let mut wf = workflow();
    assert!(wf.update(Action::SelectRow).is_empty());
}

#[test]
fn list_settles_while_form_is_open() {
    let mut wf = workflow();
    wf.mount();
    wf.update(Action::NewCategory);
    wf.update(Action::Refreshed {
        generation: 1,
        result: Ok(vec![category("a", "Bills")]),
    });
    let snap = wf.snapshot();
    assert_eq!(snap.surface, Surface::Form);
    assert_eq!(snap.categories.len(), 1);
}
