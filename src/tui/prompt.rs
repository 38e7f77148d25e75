//! Popups that ask the user for input: a one-line text prompt and a yes/no
//! confirmation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::component::Component;
use super::{centered_rect, Theme};

/// Events emitted by [`TextPrompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// User pressed Enter with this input
    Confirmed(String),
    /// User pressed Esc
    Cancelled,
}

/// Single-line text input.
#[derive(Debug, Clone)]
pub struct TextPrompt {
    title: String,
    hint: String,
    input: String,
    allow_empty: bool,
    error: Option<String>,
}

impl TextPrompt {
    /// Creates an empty prompt that refuses blank input.
    pub fn new(title: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            hint: hint.into(),
            input: String::new(),
            allow_empty: false,
            error: None,
        }
    }

    /// Pre-fills the input.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    /// Accepts a blank answer (e.g. "no hotkey").
    #[must_use]
    pub const fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Current input buffer.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Component for TextPrompt {
    type Event = PromptEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                self.error = None;
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(c);
                self.error = None;
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
            }
            KeyCode::Enter => {
                if self.input.trim().is_empty() && !self.allow_empty {
                    self.error = Some("A value is required".to_string());
                } else {
                    return Some(PromptEvent::Confirmed(self.input.trim().to_string()));
                }
            }
            KeyCode::Esc => return Some(PromptEvent::Cancelled),
            _ => {}
        }
        None
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = centered_rect(60, 40, area);
        f.render_widget(Clear, dialog_area);
        f.render_widget(
            Block::default().style(Style::default().bg(theme.background)),
            dialog_area,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Input
                Constraint::Length(2), // Hint
                Constraint::Min(1),    // Error
                Constraint::Length(1), // Keys
            ])
            .split(dialog_area);

        let input = Paragraph::new(format!("{}█", self.input))
            .style(Style::default().fg(theme.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.title))
                    .style(Style::default().fg(theme.primary).bg(theme.background)),
            );
        f.render_widget(input, chunks[0]);

        let hint = Paragraph::new(self.hint.as_str())
            .style(Style::default().fg(theme.text_muted))
            .wrap(Wrap { trim: true });
        f.render_widget(hint, chunks[1]);

        if let Some(error) = &self.error {
            let error = Paragraph::new(error.as_str()).style(Style::default().fg(theme.error));
            f.render_widget(error, chunks[2]);
        }

        f.render_widget(key_help(theme, &[("Enter", "Confirm"), ("Esc", "Cancel")]), chunks[3]);
    }
}

/// Events emitted by [`Confirm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmEvent {
    Yes,
    No,
}

/// Yes/no question.
#[derive(Debug, Clone)]
pub struct Confirm {
    message: String,
}

impl Confirm {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Component for Confirm {
    type Event = ConfirmEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Char('y' | 'Y') => Some(ConfirmEvent::Yes),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(ConfirmEvent::No),
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = centered_rect(50, 25, area);
        f.render_widget(Clear, dialog_area);

        let text = vec![
            Line::from(""),
            Line::from(self.message.as_str()),
            Line::from(""),
            Line::from("  [Y] Yes    [N] No"),
        ];
        let dialog = Paragraph::new(text).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(" Confirm ")
                .borders(Borders::ALL)
                .style(Style::default().fg(theme.warning).bg(theme.background)),
        );
        f.render_widget(dialog, dialog_area);
    }
}

/// One line of `Key Action` pairs.
pub(crate) fn key_help<'a>(theme: &Theme, keys: &[(&'a str, &'a str)]) -> Paragraph<'a> {
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (key, action) in keys {
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {action}  ")));
    }
    Paragraph::new(Line::from(spans)).style(Style::default().fg(theme.text).bg(theme.background))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(prompt: &mut TextPrompt, text: &str) {
        for c in text.chars() {
            assert_eq!(prompt.handle_input(key(KeyCode::Char(c))), None);
        }
    }

    #[test]
    fn test_prompt_confirms_trimmed_input() {
        let mut prompt = TextPrompt::new("Name", "");
        type_text(&mut prompt, " Airhorn ");
        assert_eq!(
            prompt.handle_input(key(KeyCode::Enter)),
            Some(PromptEvent::Confirmed("Airhorn".to_string()))
        );
    }

    #[test]
    fn test_prompt_rejects_blank_unless_allowed() {
        let mut prompt = TextPrompt::new("Name", "");
        assert_eq!(prompt.handle_input(key(KeyCode::Enter)), None);
        assert!(prompt.error.is_some());

        let mut prompt = TextPrompt::new("Hotkey", "").allow_empty();
        assert_eq!(
            prompt.handle_input(key(KeyCode::Enter)),
            Some(PromptEvent::Confirmed(String::new()))
        );
    }

    #[test]
    fn test_prompt_editing() {
        let mut prompt = TextPrompt::new("Name", "").with_input("abc");
        prompt.handle_input(key(KeyCode::Backspace));
        assert_eq!(prompt.input(), "ab");

        prompt.handle_input(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(prompt.input(), "");
        assert_eq!(prompt.handle_input(key(KeyCode::Esc)), Some(PromptEvent::Cancelled));
    }

    #[test]
    fn test_confirm_keys() {
        let mut confirm = Confirm::new("Delete?");
        assert_eq!(confirm.handle_input(key(KeyCode::Char('x'))), None);
        assert_eq!(confirm.handle_input(key(KeyCode::Char('y'))), Some(ConfirmEvent::Yes));
        assert_eq!(confirm.handle_input(key(KeyCode::Esc)), Some(ConfirmEvent::No));
    }
}
