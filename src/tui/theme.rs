//! Colors used across the board.
//!
//! The board ships a single dark palette.

use ratatui::style::Color;

/// Semantic color theme for the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // Primary UI colors
    /// Borders, titles and emphasis
    pub primary: Color,
    /// Highlights, selections and key hints
    pub accent: Color,
    /// Confirmations
    pub success: Color,
    /// Errors and destructive actions
    pub error: Color,
    /// Warnings and the unsaved marker
    pub warning: Color,

    // Text hierarchy
    /// Primary text content color
    pub text: Color,
    /// Secondary text color for labels
    pub text_secondary: Color,
    /// Muted text for help and empty slots
    pub text_muted: Color,

    // Backgrounds
    /// Main background color
    pub background: Color,
    /// Background of the selected button
    pub highlight_bg: Color,
    /// Background of sound buttons
    pub surface: Color,
}

impl Theme {
    /// The board palette, tuned for dark terminal backgrounds.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            warning: Color::LightRed,

            text: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,

            background: Color::Black,
            highlight_bg: Color::Rgb(60, 60, 90),
            surface: Color::Rgb(30, 30, 30),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dark() {
        assert_eq!(Theme::default(), Theme::dark());
        assert_ne!(Theme::dark().text, Theme::dark().background);
    }
}
