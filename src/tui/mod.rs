//! Interactive terminal board.
//!
//! This module contains the main loop, `AppState` and key handling. Widgets
//! live in the submodules and read the state immutably.

// Allow intentional type casts for terminal coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

pub mod board;
pub mod component;
pub mod help_overlay;
pub mod prompt;
pub mod status_bar;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::fmt::Display;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::constants::APP_NAME;
use crate::models::{Hotkey, SoundBinding};
use crate::playback::{self, PlaybackAdapter, RecordingPlayback};
use crate::services::{HotkeyUpdate, JsonFileStore, ProfileRegistry, ProfileStore, Soundboard};

pub use board::BoardWidget;
pub use component::Component;
pub use help_overlay::{HelpEvent, HelpOverlay};
pub use prompt::{Confirm, ConfirmEvent, PromptEvent, TextPrompt};
pub use status_bar::StatusBar;
pub use theme::Theme;

/// Volume change per `+`/`-` press.
const VOLUME_STEP: f32 = 0.05;

/// What a confirmed text prompt feeds into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPurpose {
    /// First step of adding a sound
    SoundName,
    /// Second step: the audio file
    SoundFile {
        /// Name entered in the first step
        name: String,
    },
    /// Last step: the optional hotkey
    SoundHotkey {
        /// Name entered in the first step
        name: String,
        /// File entered in the second step
        file: PathBuf,
    },
    /// New name for a sound
    Rename {
        /// Current name
        name: String,
    },
    /// New hotkey for a sound
    Rebind {
        /// Sound being rebound
        name: String,
    },
    /// Name of a profile to create
    NewProfile,
    /// Button filter text
    Filter,
}

/// Destructive actions that ask first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteSound(String),
    DeleteProfile(String),
}

/// Popup shown over the board. Only one is open at a time.
#[derive(Debug)]
pub enum Popup {
    Prompt {
        prompt: TextPrompt,
        purpose: PromptPurpose,
    },
    Confirm {
        dialog: Confirm,
        action: ConfirmAction,
    },
    Help(HelpOverlay),
}

/// Application state - single source of truth
///
/// Widgets read from this state immutably. Only the key handlers change it.
pub struct AppState<S: ProfileStore, P: PlaybackAdapter> {
    /// Profiles and playback
    pub board: Soundboard<S, P>,
    /// Application configuration
    pub config: Config,
    /// Current UI theme
    pub theme: Theme,
    /// Index of the selected button among the visible ones
    pub selected: usize,
    /// Case-insensitive name filter (empty shows every button)
    pub filter: String,
    /// Status bar message
    pub status_message: String,
    /// Current error message (if any)
    pub error_message: Option<String>,
    /// Currently open popup (if any)
    pub popup: Option<Popup>,
    /// Set when the user asked to quit
    pub should_quit: bool,
}

impl<S: ProfileStore, P: PlaybackAdapter> AppState<S, P> {
    pub fn new(board: Soundboard<S, P>, config: Config) -> Self {
        let popup = config
            .ui
            .show_help_on_startup
            .then(|| Popup::Help(HelpOverlay::new()));
        Self {
            board,
            config,
            theme: Theme::default(),
            selected: 0,
            filter: String::new(),
            status_message: String::new(),
            error_message: None,
            popup,
            should_quit: false,
        }
    }

    /// Buttons of the active profile that match the filter, in order.
    #[must_use]
    pub fn visible_bindings(&self) -> Vec<&SoundBinding> {
        self.board.registry().active_profile().filter(&self.filter)
    }

    /// The selected button, if any is visible.
    #[must_use]
    pub fn selected_binding(&self) -> Option<&SoundBinding> {
        self.visible_bindings().get(self.selected).copied()
    }

    fn selected_name(&self) -> Option<String> {
        self.selected_binding().map(|b| b.name.clone())
    }

    /// Shows `error` in the overlay and logs it.
    pub fn set_error(&mut self, error: impl Display) {
        let message = error.to_string();
        warn!("{message}");
        self.error_message = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_bindings().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    /// Moves the selection by whole cells; rows are `grid_columns` wide.
    pub fn move_selection(&mut self, dx: isize, dy: isize) {
        let count = self.visible_bindings().len();
        if count == 0 {
            self.selected = 0;
            return;
        }
        let columns = self.config.ui.grid_columns.max(1) as isize;
        let target = self.selected as isize + dx + dy * columns;
        if (0..count as isize).contains(&target) {
            self.selected = target as usize;
        }
    }

    /// Handles one key press. Errors end up in the overlay, never in the caller.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.error_message.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.clear_error();
            }
            return;
        }

        if self.popup.is_some() {
            self.handle_popup_key(key);
            return;
        }

        // Bound hotkeys take precedence over board commands
        if let Some(hotkey) = Hotkey::from_key_event(&key) {
            match self.board.trigger_hotkey(&hotkey) {
                Ok(Some(name)) => {
                    self.set_status(format!("Playing '{name}'"));
                    return;
                }
                Ok(None) => {}
                Err(e) => {
                    self.set_error(e);
                    return;
                }
            }
        }

        self.handle_board_key(key);
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.move_selection(-1, 0),
            KeyCode::Right => self.move_selection(1, 0),
            KeyCode::Up => self.move_selection(0, -1),
            KeyCode::Down => self.move_selection(0, 1),
            KeyCode::Enter => self.play_selected(),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') => self.popup = Some(Popup::Help(HelpOverlay::new())),
            KeyCode::Char('a') => self.open_prompt(
                TextPrompt::new("Sound name", "Name shown on the button"),
                PromptPurpose::SoundName,
            ),
            KeyCode::Char('d') => {
                if let Some(name) = self.selected_name() {
                    self.popup = Some(Popup::Confirm {
                        dialog: Confirm::new(format!("Delete sound '{name}'?")),
                        action: ConfirmAction::DeleteSound(name),
                    });
                }
            }
            KeyCode::Char('r') => {
                if let Some(name) = self.selected_name() {
                    self.open_prompt(
                        TextPrompt::new("Rename sound", "New button name").with_input(name.clone()),
                        PromptPurpose::Rename { name },
                    );
                }
            }
            KeyCode::Char('k') => {
                if let Some(binding) = self.selected_binding() {
                    let current = binding.hotkey.map(|h| h.to_string()).unwrap_or_default();
                    let name = binding.name.clone();
                    self.open_prompt(
                        TextPrompt::new("Hotkey", "e.g. F1, Ctrl+1 or Alt+Q. Leave empty to remove")
                            .with_input(current)
                            .allow_empty(),
                        PromptPurpose::Rebind { name },
                    );
                }
            }
            KeyCode::Char('p') => self.cycle_profile(true),
            KeyCode::Char('P') => self.cycle_profile(false),
            KeyCode::Char('n') => self.open_prompt(
                TextPrompt::new("New profile", "The new profile becomes active"),
                PromptPurpose::NewProfile,
            ),
            KeyCode::Char('x') => {
                let name = self.board.registry().active_profile().name.clone();
                self.popup = Some(Popup::Confirm {
                    dialog: Confirm::new(format!("Delete profile '{name}' and all its sounds?")),
                    action: ConfirmAction::DeleteProfile(name),
                });
            }
            KeyCode::Char('/') => self.open_prompt(
                TextPrompt::new("Filter", "Show buttons whose name contains this text")
                    .with_input(self.filter.clone())
                    .allow_empty(),
                PromptPurpose::Filter,
            ),
            KeyCode::Char('+' | '=') => self.change_volume(VOLUME_STEP),
            KeyCode::Char('-') => self.change_volume(-VOLUME_STEP),
            KeyCode::Char('l') => {
                let looping = self.board.toggle_loop();
                self.set_status(format!("Loop {}", if looping { "on" } else { "off" }));
            }
            KeyCode::Char('s') => {
                self.board.stop_all();
                self.set_status("Stopped all sounds");
            }
            KeyCode::Char('?') => match self.board.play_random() {
                Ok(Some(name)) => self.set_status(format!("Playing '{name}'")),
                Ok(None) => self.set_status("No sounds to pick from"),
                Err(e) => self.set_error(e),
            },
            _ => {}
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        let Some(popup) = self.popup.take() else {
            return;
        };

        match popup {
            Popup::Prompt {
                mut prompt,
                purpose,
            } => match prompt.handle_input(key) {
                Some(PromptEvent::Confirmed(value)) => self.apply_prompt(purpose, value),
                Some(PromptEvent::Cancelled) => {}
                None => self.popup = Some(Popup::Prompt { prompt, purpose }),
            },
            Popup::Confirm { mut dialog, action } => match dialog.handle_input(key) {
                Some(ConfirmEvent::Yes) => self.apply_confirm(action),
                Some(ConfirmEvent::No) => {}
                None => self.popup = Some(Popup::Confirm { dialog, action }),
            },
            Popup::Help(mut help) => {
                if help.handle_input(key).is_none() {
                    self.popup = Some(Popup::Help(help));
                }
            }
        }
    }

    fn open_prompt(&mut self, prompt: TextPrompt, purpose: PromptPurpose) {
        self.popup = Some(Popup::Prompt { prompt, purpose });
    }

    fn apply_prompt(&mut self, purpose: PromptPurpose, value: String) {
        let profile = self.board.registry().active_profile().name.clone();
        let result = match purpose {
            PromptPurpose::SoundName => {
                self.open_prompt(
                    TextPrompt::new("Sound file", "Path to a wav, mp3, ogg or flac file"),
                    PromptPurpose::SoundFile { name: value },
                );
                Ok(())
            }
            PromptPurpose::SoundFile { name } => {
                self.open_prompt(
                    TextPrompt::new("Hotkey", "e.g. F1, Ctrl+1 or Alt+Q. Leave empty for none")
                        .allow_empty(),
                    PromptPurpose::SoundHotkey {
                        name,
                        file: PathBuf::from(value),
                    },
                );
                Ok(())
            }
            PromptPurpose::SoundHotkey { name, file } => self
                .board
                .registry_mut()
                .add_binding(&profile, &name, file, Some(&value))
                .map(|()| {
                    self.selected = self.visible_bindings().len().saturating_sub(1);
                    self.set_status(format!("Added '{name}'"));
                }),
            PromptPurpose::Rename { name } => self
                .board
                .registry_mut()
                .rename_or_rebind(&profile, &name, Some(&value), HotkeyUpdate::Keep)
                .map(|()| self.set_status(format!("Renamed '{name}' to '{value}'"))),
            PromptPurpose::Rebind { name } => Hotkey::parse_optional(&value)
                .map(|hotkey| hotkey.map_or(HotkeyUpdate::Clear, HotkeyUpdate::Set))
                .and_then(|update| {
                    self.board
                        .registry_mut()
                        .rename_or_rebind(&profile, &name, None, update)
                })
                .map(|()| self.set_status(format!("Updated hotkey of '{name}'"))),
            PromptPurpose::NewProfile => self
                .board
                .registry_mut()
                .create_profile(&value)
                .map(|()| {
                    self.reset_view();
                    self.set_status(format!("Created profile '{value}'"));
                }),
            PromptPurpose::Filter => {
                self.filter = value;
                self.selected = 0;
                Ok(())
            }
        };

        if let Err(e) = result {
            self.set_error(e);
        }
        self.clamp_selection();
    }

    fn apply_confirm(&mut self, action: ConfirmAction) {
        let result = match action {
            ConfirmAction::DeleteSound(name) => {
                let profile = self.board.registry().active_profile().name.clone();
                self.board
                    .registry_mut()
                    .remove_binding(&profile, &name)
                    .map(|()| self.set_status(format!("Deleted '{name}'")))
            }
            ConfirmAction::DeleteProfile(name) => {
                self.board.registry_mut().delete_profile(&name).map(|()| {
                    self.board.preload_active();
                    self.reset_view();
                    self.set_status(format!("Deleted profile '{name}'"));
                })
            }
        };

        if let Err(e) = result {
            self.set_error(e);
        }
        self.clamp_selection();
    }

    fn play_selected(&mut self) {
        let Some(name) = self.selected_name() else {
            return;
        };
        match self.board.trigger(&name) {
            Ok(()) => self.set_status(format!("Playing '{name}'")),
            Err(e) => self.set_error(e),
        }
    }

    fn cycle_profile(&mut self, forward: bool) {
        let names: Vec<String> = self
            .board
            .registry()
            .list_profiles()
            .into_iter()
            .map(str::to_string)
            .collect();
        let active = self.board.registry().active_profile().name.clone();
        let Some(index) = names.iter().position(|n| *n == active) else {
            return;
        };
        let next = if forward {
            (index + 1) % names.len()
        } else {
            (index + names.len() - 1) % names.len()
        };

        match self.board.switch_profile(&names[next]) {
            Ok(()) => {
                self.reset_view();
                self.set_status(format!("Profile: {}", names[next]));
            }
            Err(e) => self.set_error(e),
        }
    }

    fn change_volume(&mut self, delta: f32) {
        let volume = ((self.board.volume() + delta) * 100.0).round() / 100.0;
        self.board.set_volume(volume);
        self.set_status(format!("Volume {:.0}%", self.board.volume() * 100.0));
    }

    fn reset_view(&mut self) {
        self.selected = 0;
        self.filter.clear();
    }

    /// Copies volume and loop mode into the configuration.
    pub fn sync_config(&mut self) {
        self.config.playback.volume = self.board.volume();
        self.config.playback.loop_playback = self.board.looping();
    }
}

/// Opens the profile store and audio output, then runs the board until quit.
///
/// Volume and loop mode are written back to the configuration on exit.
pub fn run(config: Config, store_path: PathBuf) -> Result<()> {
    let registry = ProfileRegistry::open(
        JsonFileStore::new(&store_path),
        config.board.max_bindings_per_profile,
    )
    .with_context(|| format!("Failed to open profile store {}", store_path.display()))?;

    let mut audio_error = None;
    let playback: Box<dyn PlaybackAdapter> =
        match playback::open_adapter(config.playback.output_device.as_deref()) {
            Ok(adapter) => adapter,
            Err(e) => {
                audio_error = Some(format!("Audio output unavailable, sounds are muted: {e}"));
                Box::new(RecordingPlayback::new())
            }
        };

    let board = Soundboard::new(
        registry,
        playback,
        config.playback.volume,
        config.playback.loop_playback,
    );
    let mut state = AppState::new(board, config);
    if let Some(message) = audio_error {
        state.set_error(message);
    }

    info!(store = %store_path.display(), "board started");
    let mut terminal = setup_terminal()?;
    let result = run_tui(&mut state, &mut terminal);
    restore_terminal(terminal)?;
    result?;

    state.board.stop_all();
    if let Err(e) = state.board.registry_mut().flush() {
        warn!("profile store not saved on exit: {e}");
    }
    state.sync_config();
    state.config.save().context("Failed to save configuration")?;
    info!("board closed");
    Ok(())
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui<S: ProfileStore, P: PlaybackAdapter>(
    state: &mut AppState<S, P>,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, state))?;

        // Poll for events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    state.handle_key(key);
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

/// Render the UI from current state
fn render<S: ProfileStore, P: PlaybackAdapter>(f: &mut Frame, state: &AppState<S, P>) {
    let full_bg = Block::default().style(Style::default().bg(state.theme.background));
    f.render_widget(full_bg, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Button grid
            Constraint::Length(4), // Status bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], state);
    BoardWidget::render(f, chunks[1], state);
    StatusBar::render(f, chunks[2], state);

    match &state.popup {
        Some(Popup::Prompt { prompt, .. }) => prompt.render(f, f.area(), &state.theme),
        Some(Popup::Confirm { dialog, .. }) => dialog.render(f, f.area(), &state.theme),
        Some(Popup::Help(help)) => help.render(f, f.area(), &state.theme),
        None => {}
    }

    if let Some(ref error) = state.error_message {
        render_error_overlay(f, error, &state.theme);
    }
}

/// Render title bar with profile, volume, loop mode and the unsaved marker
fn render_title_bar<S: ProfileStore, P: PlaybackAdapter>(
    f: &mut Frame,
    area: Rect,
    state: &AppState<S, P>,
) {
    let theme = &state.theme;
    let registry = state.board.registry();

    let mut spans = vec![
        Span::styled(
            format!(" {APP_NAME} "),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("│ {} ", registry.active_profile().name),
            Style::default().fg(theme.text),
        ),
        Span::styled(
            format!("│ Vol {:.0}% ", state.board.volume() * 100.0),
            Style::default().fg(theme.text_secondary),
        ),
        Span::styled(
            format!("│ Loop {} ", if state.board.looping() { "on" } else { "off" }),
            Style::default().fg(theme.text_secondary),
        ),
    ];
    if registry.has_unsaved_changes() {
        spans.push(Span::styled(
            "│ unsaved",
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().fg(theme.primary).bg(theme.background)),
    );
    f.render_widget(title, area);
}

/// Render error overlay on top of all other UI elements
fn render_error_overlay(f: &mut Frame, error: &str, theme: &Theme) {
    let area = centered_rect(70, 30, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let message = Paragraph::new(error)
        .style(Style::default().fg(theme.text).bg(theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Error ")
                .style(Style::default().fg(theme.error).bg(theme.background)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(message, chunks[0]);
    f.render_widget(prompt::key_help(theme, &[("Enter/Esc", "Dismiss")]), chunks[1]);
}

/// Helper to create a centered rectangle
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
