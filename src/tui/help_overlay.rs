//! Help overlay listing every board key, opened with `h`.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::component::Component;
use super::{centered_rect, Theme};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "PLAY",
        &[
            ("Arrows", "Select a button"),
            ("Enter", "Play the selected sound"),
            ("hotkey", "Play the sound bound to it"),
            ("?", "Play a random sound"),
            ("s", "Stop all sounds"),
            ("+ / -", "Volume up / down"),
            ("l", "Toggle loop mode"),
        ],
    ),
    (
        "SOUNDS",
        &[
            ("a", "Add a sound"),
            ("d", "Delete the selected sound"),
            ("r", "Rename the selected sound"),
            ("k", "Change the selected sound's hotkey"),
            ("/", "Filter buttons by name"),
        ],
    ),
    (
        "PROFILES",
        &[
            ("p / P", "Next / previous profile"),
            ("n", "New profile"),
            ("x", "Delete the active profile"),
        ],
    ),
    (
        "SYSTEM",
        &[("h", "Toggle this help"), ("q / Ctrl+C", "Quit")],
    ),
];

/// Events emitted by the help overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpEvent {
    Closed,
}

/// Scrollable key reference.
#[derive(Debug, Clone, Default)]
pub struct HelpOverlay {
    scroll_offset: usize,
}

impl HelpOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn line_count() -> usize {
        SECTIONS.iter().map(|(_, keys)| keys.len() + 2).sum()
    }

    fn content(theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(Self::line_count());
        for (title, keys) in SECTIONS {
            lines.push(Line::from(Span::styled(
                format!("═══ {title} ═══"),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, action) in *keys {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {key:<14}"), Style::default().fg(theme.success)),
                    Span::styled(*action, Style::default().fg(theme.text)),
                ]));
            }
            lines.push(Line::from(""));
        }
        lines
    }
}

impl Component for HelpOverlay {
    type Event = HelpEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Up => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            KeyCode::Down => {
                if self.scroll_offset + 1 < Self::line_count() {
                    self.scroll_offset += 1;
                }
            }
            KeyCode::Home => self.scroll_offset = 0,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('h' | 'q') => {
                return Some(HelpEvent::Closed)
            }
            _ => {}
        }
        None
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let area = centered_rect(60, 80, area);
        f.render_widget(Clear, area);

        let help = Paragraph::new(Self::content(theme))
            .scroll((u16::try_from(self.scroll_offset).unwrap_or(u16::MAX), 0))
            .style(Style::default().bg(theme.background))
            .block(
                Block::default()
                    .title(" Help (Esc to close) ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .style(Style::default().fg(theme.primary).bg(theme.background)),
            );
        f.render_widget(help, area);
    }
}
