use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tally_core::palette::parse_hex_color;
use tally_core::Category;

use crate::workflow::Snapshot;

/// Terminal color for a color token, if it is a `#RRGGBB` value.
pub fn token_color(token: &str) -> Option<Color> {
    parse_hex_color(token).map(|(r, g, b)| Color::Rgb(r, g, b))
}

pub fn swatch(token: &str) -> Span<'static> {
    match token_color(token) {
        Some(color) => Span::styled("██ ", Style::default().fg(color)),
        None => Span::styled("?? ", Style::default().fg(Color::DarkGray)),
    }
}

fn category_line(category: &Category) -> Line<'_> {
    Line::from(vec![
        swatch(&category.color),
        Span::styled(
            format!("[{}] ", category.icon),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(category.name.as_str()),
    ])
}

pub fn render(frame: &mut Frame, snapshot: &Snapshot, is_active: bool, area: Rect) {
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(format!(" Categories ({}) ", snapshot.categories.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if snapshot.categories.is_empty() {
        let text = if snapshot.loaded {
            "No categories yet. Press n to create one."
        } else {
            "Loading..."
        };
        let paragraph = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = snapshot
        .categories
        .iter()
        .map(|c| ListItem::new(category_line(c)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .bold(),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(snapshot.cursor);
    frame.render_stateful_widget(list, area, &mut state);
}
