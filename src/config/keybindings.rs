//! Keybinding configuration for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::{Action, ComposeAction};

/// Configuration for all keybindings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub back: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub next_page: Vec<String>,
    pub prev_page: Vec<String>,
    pub select: Vec<String>,
    pub mark_read: Vec<String>,
    pub open_in_browser: Vec<String>,
    pub attach_image: Vec<String>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: vec!["q".to_string(), "Ctrl+c".to_string()],
            back: vec!["Esc".to_string()],
            move_up: vec!["k".to_string(), "Up".to_string()],
            move_down: vec!["j".to_string(), "Down".to_string()],
            next_page: vec!["n".to_string(), "PageDown".to_string()],
            prev_page: vec!["p".to_string(), "PageUp".to_string()],
            select: vec!["Enter".to_string()],
            mark_read: vec!["m".to_string()],
            open_in_browser: vec!["o".to_string()],
            attach_image: vec!["Ctrl+v".to_string()],
        }
    }
}

impl KeybindingConfig {
    /// Action for a key pressed on the list or detail screen.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        if matches_key(key, &self.quit) {
            Action::Quit
        } else if matches_key(key, &self.back) {
            Action::Back
        } else if matches_key(key, &self.move_up) {
            Action::MoveUp
        } else if matches_key(key, &self.move_down) {
            Action::MoveDown
        } else if matches_key(key, &self.next_page) {
            Action::NextPage
        } else if matches_key(key, &self.prev_page) {
            Action::PrevPage
        } else if matches_key(key, &self.select) {
            Action::Select
        } else if matches_key(key, &self.mark_read) {
            Action::MarkRead
        } else if matches_key(key, &self.open_in_browser) {
            Action::OpenInBrowser
        } else {
            Action::None
        }
    }

    /// Action for a key pressed while composing. Bindings that would type a
    /// character are ignored here so they reach the draft.
    pub fn get_compose_action(&self, key: &KeyEvent) -> ComposeAction {
        if matches_command_key(key, &self.quit) {
            ComposeAction::Quit
        } else if matches_command_key(key, &self.back) {
            ComposeAction::Cancel
        } else if matches_command_key(key, &self.select) {
            ComposeAction::Commit
        } else if matches_command_key(key, &self.attach_image) {
            ComposeAction::AttachImage
        } else {
            match key.code {
                KeyCode::Backspace => ComposeAction::Backspace,
                KeyCode::Left => ComposeAction::CursorLeft,
                KeyCode::Right => ComposeAction::CursorRight,
                KeyCode::Char(c)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    ComposeAction::Insert(c)
                }
                _ => ComposeAction::None,
            }
        }
    }
}

fn matches_key(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings
        .iter()
        .filter_map(|binding| parse_key_string(binding).ok())
        .any(|parsed| parsed.matches(key))
}

fn matches_command_key(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings
        .iter()
        .filter_map(|binding| parse_key_string(binding).ok())
        .filter(|parsed| !parsed.types_text())
        .any(|parsed| parsed.matches(key))
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Check if this binding matches a key event.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }

    /// True for plain characters, which insert text in the composer.
    fn types_text(&self) -> bool {
        matches!(self.code, KeyCode::Char(_))
            && !self
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    }
}

/// Parse a key string into a KeyBinding.
///
/// Supported formats:
/// - Single characters: "a", "A", "1", "/"
/// - Special keys: "Enter", "Tab", "BackTab", "Backspace", "Delete", "Home", "End",
///   "PageUp", "PageDown", "Up", "Down", "Left", "Right", "Esc", "Space", "F1"-"F12"
/// - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter", "Ctrl+Shift+a"
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    let (modifier_parts, key_part) = match s.rsplit_once('+') {
        // "+" on its own or "Ctrl++" binds the plus key itself
        Some((mods, "")) => (Some(mods.trim_end_matches('+')), "+"),
        Some((mods, key)) => (Some(mods), key),
        None => (None, s),
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in modifier_parts
        .into_iter()
        .flat_map(|m| m.split('+'))
        .filter(|p| !p.is_empty())
    {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier: {}", part)),
        }
    }

    let code = parse_key_code(key_part)?;
    Ok(KeyBinding { code, modifiers })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        other => other
            .strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F)
            .ok_or_else(|| format!("Unknown key: {}", s)),
    }
}
