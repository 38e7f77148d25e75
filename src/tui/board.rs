//! Grid of sound buttons for the active profile.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{AppState, Theme};
use crate::models::SoundBinding;
use crate::playback::PlaybackAdapter;
use crate::services::ProfileStore;

const BUTTON_HEIGHT: u16 = 4;

/// Sound button grid widget
pub struct BoardWidget;

impl BoardWidget {
    /// Render the buttons of the active profile, `columns` per row.
    pub fn render<S: ProfileStore, P: PlaybackAdapter>(
        f: &mut Frame,
        area: Rect,
        state: &AppState<S, P>,
    ) {
        let theme = &state.theme;
        let profile = state.board.registry().active_profile();
        let title = if state.filter.is_empty() {
            format!(" {} ", profile.name)
        } else {
            format!(" {} (filter: {}) ", profile.name, state.filter)
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .style(Style::default().fg(theme.primary).bg(theme.background));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let bindings = state.visible_bindings();
        if bindings.is_empty() {
            let message = if profile.is_empty() {
                "No sounds yet. Press 'a' to add one."
            } else {
                "No sounds match the filter. Press '/' to change it."
            };
            let empty = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.text_muted));
            f.render_widget(empty, inner);
            return;
        }

        let columns = state.config.ui.grid_columns.max(1);
        let rows: Vec<&[&SoundBinding]> = bindings.chunks(columns).collect();
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                rows.iter()
                    .map(|_| Constraint::Length(BUTTON_HEIGHT))
                    .chain(std::iter::once(Constraint::Min(0))),
            )
            .split(inner);

        let column_constraints: Vec<Constraint> = (0..columns)
            .map(|_| Constraint::Ratio(1, columns as u32))
            .collect();

        for (row, (buttons, row_area)) in rows.iter().zip(row_areas.iter()).enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(column_constraints.clone())
                .split(*row_area);

            for (col, (binding, cell)) in buttons.iter().zip(cells.iter()).enumerate() {
                let selected = row * columns + col == state.selected;
                render_button(f, *cell, binding, selected, theme);
            }
        }
    }
}

fn render_button(f: &mut Frame, area: Rect, binding: &SoundBinding, selected: bool, theme: &Theme) {
    let (border, bg) = if selected {
        (theme.accent, theme.highlight_bg)
    } else {
        (theme.text_secondary, theme.surface)
    };

    let hotkey = binding
        .hotkey
        .map_or_else(|| "no hotkey".to_string(), |h| h.to_string());
    let text = vec![
        Line::from(Span::styled(
            binding.name.as_str(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(hotkey, Style::default().fg(theme.text_muted))),
    ];

    let button = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(border).bg(bg)),
        );
    f.render_widget(button, area);
}
