use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use tally_core::{Category, DraftField, Palette};
use tally_service::CategoryService;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::components::category_list::{self, swatch};
use crate::config::TuiConfig;
use crate::shell::{CloseCallback, Embedding, Navigator, SelectCallback, Shell};
use crate::workflow::{Action, PickerKind, RefreshPolicy, Snapshot, Surface};

/// Order the form's fields are visited with Tab.
const FOCUS_ORDER: [DraftField; 3] = [DraftField::Name, DraftField::Icon, DraftField::Color];

#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub palette: Palette,
    pub refresh_policy: RefreshPolicy,
    /// Embedded picker mode: choosing a row ends the app with that category.
    pub pick: bool,
}

impl From<&TuiConfig> for AppOptions {
    fn from(config: &TuiConfig) -> Self {
        Self {
            palette: config.palette(),
            refresh_policy: config.refresh_policy(),
            pick: config.pick,
        }
    }
}

/// The category screen is the root of the terminal app, so going back
/// leaves it.
struct ExitOnBack(Rc<Cell<bool>>);

impl Navigator for ExitOnBack {
    fn go_back(&mut self) {
        self.0.set(true);
    }
}

pub struct App {
    shell: Shell,
    snapshot: watch::Receiver<Snapshot>,
    exit: Rc<Cell<bool>>,
    picked: Rc<RefCell<Option<Category>>>,
    focus: DraftField,
}

impl App {
    pub fn new(service: Arc<dyn CategoryService>, handle: Handle, options: AppOptions) -> Self {
        let exit = Rc::new(Cell::new(false));
        let picked = Rc::new(RefCell::new(None));

        let embedding = if options.pick {
            let on_select: SelectCallback = {
                let exit = Rc::clone(&exit);
                let picked = Rc::clone(&picked);
                Box::new(move |category: Category| {
                    picked.replace(Some(category));
                    exit.set(true);
                })
            };
            let on_close: CloseCallback = {
                let exit = Rc::clone(&exit);
                Box::new(move || exit.set(true))
            };
            Embedding::picker(on_select, Some(on_close))
        } else {
            Embedding::standalone()
        };

        let mut shell = Shell::new(
            service,
            handle,
            options.palette,
            options.refresh_policy,
            embedding,
            Box::new(ExitOnBack(Rc::clone(&exit))),
        );
        let snapshot = shell.subscribe();
        shell.mount();

        Self {
            shell,
            snapshot,
            exit,
            picked,
            focus: DraftField::Name,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    pub fn surface(&self) -> Surface {
        self.snapshot.borrow().surface
    }

    pub fn focus(&self) -> DraftField {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.exit.get()
    }

    /// The category chosen in picker mode, if any.
    pub fn picked(&self) -> Option<Category> {
        self.picked.borrow().clone()
    }

    /// True when printable keys are text input rather than commands.
    pub fn is_input_mode(&self) -> bool {
        self.surface() == Surface::Form && self.focus == DraftField::Name
    }

    /// Apply persistence results that have already arrived.
    pub fn pump(&mut self) -> usize {
        self.shell.pump()
    }

    /// Wait for the next persistence result and apply it.
    pub async fn settle_next(&mut self) -> bool {
        self.shell.next_settlement().await
    }

    fn dispatch(&mut self, action: Action) {
        self.shell.dispatch(action);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.surface() {
            Surface::List => self.handle_list(key),
            Surface::Form => self.handle_form(key),
            Surface::IconPicker | Surface::ColorPicker => self.handle_picker(key),
        }
    }

    fn handle_list(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => {
                self.focus = DraftField::Name;
                self.dispatch(Action::NewCategory);
            }
            KeyCode::Char('j') | KeyCode::Down => self.dispatch(Action::MoveCursor(1)),
            KeyCode::Char('k') | KeyCode::Up => self.dispatch(Action::MoveCursor(-1)),
            KeyCode::Enter => self.dispatch(Action::SelectRow),
            KeyCode::Char('r') => self.dispatch(Action::Refresh),
            KeyCode::Esc | KeyCode::Char('q') => self.dispatch(Action::Close),
            _ => {}
        }
    }

    fn handle_form(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.dispatch(Action::CancelForm),
            KeyCode::Char('s') if ctrl => self.dispatch(Action::Save),
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Enter => match self.focus {
                DraftField::Name => self.dispatch(Action::Save),
                DraftField::Icon => self.dispatch(Action::OpenPicker(PickerKind::Icon)),
                DraftField::Color => self.dispatch(Action::OpenPicker(PickerKind::Color)),
            },
            KeyCode::Backspace if self.focus == DraftField::Name => {
                self.dispatch(Action::Backspace)
            }
            KeyCode::Char(c) if !ctrl && self.focus == DraftField::Name => {
                self.dispatch(Action::TypeChar(c))
            }
            _ => {}
        }
    }

    fn handle_picker(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => {
                self.dispatch(Action::MovePicker(1))
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => {
                self.dispatch(Action::MovePicker(-1))
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.dispatch(Action::CommitPicker),
            KeyCode::Esc | KeyCode::Char('q') => self.dispatch(Action::DismissPicker),
            _ => {}
        }
    }

    fn move_focus(&mut self, delta: i32) {
        let len = FOCUS_ORDER.len() as i32;
        let idx = FOCUS_ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0) as i32;
        self.focus = FOCUS_ORDER[(idx + delta).rem_euclid(len) as usize];
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut Frame) {
        let snapshot = self.snapshot.borrow();
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        category_list::render(frame, &snapshot, snapshot.surface == Surface::List, layout[1]);
        self.render_status_bar(frame, &snapshot, layout[2]);

        // Overlays, bottom to top
        if snapshot.form_open() {
            self.render_form(frame, &snapshot, area);
        }
        if let Some(picker) = &snapshot.picker {
            render_picker(
                frame,
                picker.kind,
                snapshot.options(picker.kind),
                picker.highlighted.as_deref(),
                area,
            );
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            " tally ",
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        )];
        spans.push(Span::raw(" Categories"));
        if self.shell.is_picker() {
            spans.push(Span::styled(
                "  (choose a category)",
                Style::default().fg(Color::Yellow),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
        let line = if let Some(err) = &snapshot.fetch_error {
            Line::from(Span::styled(
                format!(" Could not load categories: {err} (r to retry)"),
                Style::default().fg(Color::Red),
            ))
        } else {
            let hints = match snapshot.surface {
                Surface::List => " n new  j/k move  Enter select  r refresh  q close",
                Surface::Form => " Tab next field  Enter save/pick  Ctrl+S save  Esc cancel",
                Surface::IconPicker | Surface::ColorPicker => {
                    " j/k move  Enter choose  Esc back"
                }
            };
            Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_form(&self, frame: &mut Frame, snapshot: &Snapshot, area: Rect) {
        let Some(draft) = &snapshot.draft else {
            return;
        };
        let popup = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" New Category ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let label_style = |field: DraftField| {
            if field == self.focus && snapshot.surface == Surface::Form {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default()
            }
        };
        let unset = || Span::styled("(none)", Style::default().fg(Color::DarkGray));

        let mut lines: Vec<Line> = snapshot
            .errors
            .messages()
            .iter()
            .map(|msg| {
                Line::from(Span::styled(
                    format!("! {msg}"),
                    Style::default().fg(Color::Red),
                ))
            })
            .collect();
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![
            Span::styled("Title: ", label_style(DraftField::Name)),
            Span::raw(draft.name.clone().unwrap_or_default()),
        ]));
        lines.push(Line::from(""));

        let mut icon_line = vec![Span::styled("Icon:  ", label_style(DraftField::Icon))];
        match &draft.icon {
            Some(icon) => icon_line.push(Span::raw(icon.clone())),
            None => icon_line.push(unset()),
        }
        lines.push(Line::from(icon_line));
        lines.push(Line::from(""));

        let mut color_line = vec![Span::styled("Color: ", label_style(DraftField::Color))];
        match &draft.color {
            Some(color) => {
                color_line.push(swatch(color));
                color_line.push(Span::raw(color.clone()));
            }
            None => color_line.push(unset()),
        }
        lines.push(Line::from(color_line));
        lines.push(Line::from(""));

        if snapshot.submitting {
            lines.push(Line::from(Span::styled(
                "Saving...",
                Style::default().fg(Color::Yellow).bold(),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "[Save]",
                Style::default().fg(Color::Green).bold(),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
    }
}

fn render_picker(
    frame: &mut Frame,
    kind: PickerKind,
    options: &[String],
    highlighted: Option<&str>,
    area: Rect,
) {
    let popup = centered_rect(40, 60, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" Select {kind} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let items: Vec<ListItem> = options
        .iter()
        .map(|option| match kind {
            PickerKind::Color => ListItem::new(Line::from(vec![
                swatch(option),
                Span::raw(option.as_str()),
            ])),
            PickerKind::Icon => ListItem::new(option.as_str()),
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .bold(),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(highlighted.and_then(|h| options.iter().position(|o| o == h)));
    frame.render_stateful_widget(list, popup, &mut state);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
