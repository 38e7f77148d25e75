//! Hotkey chords for triggering sounds from the keyboard.
//!
//! Hotkeys are parsed from user-facing strings such as `F1`, `ctrl+1` or
//! `Ctrl+Shift+A` and kept in a canonical form, so two spellings of the same
//! chord compare equal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;

/// The non-modifier part of a hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character (letters are stored upper-case)
    Char(char),
    /// Function key F1-F24
    Function(u8),
    Space,
    Enter,
    Tab,
    Backspace,
    Esc,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Self::from_char(c));
        }

        let lower = token.to_ascii_lowercase();
        let key = match lower.as_str() {
            "space" => Self::Space,
            "enter" | "return" => Self::Enter,
            "tab" => Self::Tab,
            "backspace" => Self::Backspace,
            "esc" | "escape" => Self::Esc,
            "insert" | "ins" => Self::Insert,
            "delete" | "del" => Self::Delete,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" | "pgup" => Self::PageUp,
            "pagedown" | "pgdn" => Self::PageDown,
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            other => {
                let n: u8 = other.strip_prefix('f')?.parse().ok()?;
                if (1..=24).contains(&n) {
                    Self::Function(n)
                } else {
                    return None;
                }
            }
        };
        Some(key)
    }

    fn from_char(c: char) -> Self {
        if c == ' ' {
            Self::Space
        } else {
            Self::Char(c.to_ascii_uppercase())
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Function(n) => write!(f, "F{n}"),
            Self::Space => write!(f, "Space"),
            Self::Enter => write!(f, "Enter"),
            Self::Tab => write!(f, "Tab"),
            Self::Backspace => write!(f, "Backspace"),
            Self::Esc => write!(f, "Esc"),
            Self::Insert => write!(f, "Insert"),
            Self::Delete => write!(f, "Delete"),
            Self::Home => write!(f, "Home"),
            Self::End => write!(f, "End"),
            Self::PageUp => write!(f, "PageUp"),
            Self::PageDown => write!(f, "PageDown"),
            Self::Up => write!(f, "Up"),
            Self::Down => write!(f, "Down"),
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
        }
    }
}

/// A key chord: zero or more modifiers plus one key.
///
/// # Examples
///
/// ```
/// use soundboard::models::Hotkey;
///
/// let a: Hotkey = "shift+ctrl+a".parse().unwrap();
/// let b: Hotkey = "Ctrl+Shift+A".parse().unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "Ctrl+Shift+A");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    ctrl: bool,
    alt: bool,
    shift: bool,
    meta: bool,
    key: Key,
}

impl Hotkey {
    /// Creates a hotkey without modifiers.
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
            key,
        }
    }

    /// Returns the non-modifier key.
    #[must_use]
    pub const fn key(&self) -> Key {
        self.key
    }

    /// Parses an optional hotkey where an empty or blank string means "none".
    pub fn parse_optional(input: &str) -> Result<Option<Self>, BoardError> {
        if input.trim().is_empty() {
            Ok(None)
        } else {
            input.parse().map(Some)
        }
    }

    /// Converts a terminal key event into a hotkey.
    ///
    /// Returns `None` for keys that cannot be bound (media keys, bare modifiers).
    /// Shift is dropped for non-letter characters because the character itself
    /// already reflects it (`Shift+1` arrives as `!`).
    #[must_use]
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        let mods = event.modifiers;
        let mut shift = mods.contains(KeyModifiers::SHIFT);
        let key = match event.code {
            KeyCode::Char(c) => {
                if !c.is_ascii_alphabetic() {
                    shift = false;
                }
                Key::from_char(c)
            }
            KeyCode::F(n) if (1..=24).contains(&n) => Key::Function(n),
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => {
                shift = true;
                Key::Tab
            }
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc => Key::Esc,
            KeyCode::Insert => Key::Insert,
            KeyCode::Delete => Key::Delete,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            _ => return None,
        };

        Some(Self {
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
            shift,
            meta: mods.contains(KeyModifiers::SUPER) || mods.contains(KeyModifiers::META),
            key,
        })
    }
}

impl FromStr for Hotkey {
    type Err = BoardError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| BoardError::InvalidHotkey {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("hotkey is empty"));
        }

        // A trailing "++" means the key itself is '+'
        let (mods_part, key_part) = if trimmed == "+" {
            ("", "+")
        } else if let Some(rest) = trimmed.strip_suffix("++") {
            (rest, "+")
        } else {
            trimmed.rsplit_once('+').unwrap_or(("", trimmed))
        };

        let key = Key::parse(key_part.trim()).ok_or_else(|| invalid("unknown key"))?;
        let mut hotkey = Self::plain(key);

        for token in mods_part.split('+').map(str::trim).filter(|t| !t.is_empty()) {
            match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => hotkey.ctrl = true,
                "alt" | "option" => hotkey.alt = true,
                "shift" => hotkey.shift = true,
                "super" | "meta" | "cmd" | "win" => hotkey.meta = true,
                _ => return Err(invalid(&format!("unknown modifier '{token}'"))),
            }
        }

        Ok(hotkey)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        if self.meta {
            write!(f, "Super+")?;
        }
        write!(f, "{}", self.key)
    }
}
