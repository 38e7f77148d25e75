//! Status bar widget for status messages and key hints

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::AppState;
use crate::playback::PlaybackAdapter;
use crate::services::ProfileStore;

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status line and the key hints below it.
    pub fn render<S: ProfileStore, P: PlaybackAdapter>(
        f: &mut Frame,
        area: Rect,
        state: &AppState<S, P>,
    ) {
        let theme = &state.theme;

        let status_line = if let Some(binding) = state.selected_binding() {
            if state.status_message.is_empty() {
                Line::from(vec![
                    Span::styled("Selected: ", Style::default().fg(theme.primary)),
                    Span::styled(binding.name.as_str(), Style::default().fg(theme.text)),
                    Span::styled(
                        format!("  {}", binding.file.display()),
                        Style::default().fg(theme.text_muted),
                    ),
                ])
            } else {
                Line::from(state.status_message.as_str())
            }
        } else {
            Line::from(state.status_message.as_str())
        };

        let hints = [
            ("Enter", "Play"),
            ("a", "Add"),
            ("d", "Delete"),
            ("p", "Profile"),
            ("s", "Stop"),
            ("h", "Help"),
            ("q", "Quit"),
        ];
        let mut hint_spans = Vec::with_capacity(hints.len() * 2);
        for (key, action) in hints {
            hint_spans.push(Span::styled(
                key,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            hint_spans.push(Span::styled(
                format!(" {action}  "),
                Style::default().fg(theme.text_secondary),
            ));
        }

        let bar = Paragraph::new(vec![status_line, Line::from(hint_spans)])
            .style(Style::default().fg(theme.text).bg(theme.background))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().fg(theme.primary).bg(theme.background)),
            );
        f.render_widget(bar, area);
    }
}
