//! Command map: translates raw key events into widget commands.
//!
//! Widgets never match on concrete keys for confirm/cancel/navigation; they
//! ask the `CommandMap`, so bindings can be changed from the config file.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::{ConfigError, ConfigResult};

/// Commands a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Confirm / open / pick the focused row
    Activate,
    /// Dismiss a pop-up
    Cancel,
    /// Move focus to the previous row
    CursorUp,
    /// Move focus to the next row
    CursorDown,
}

/// Mapping from keys to commands.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandMap {
    bindings: HashMap<(KeyCode, KeyModifiers), Command>,
}

impl Default for CommandMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind(KeyCode::Enter, KeyModifiers::NONE, Command::Activate);
        map.bind(KeyCode::Char(' '), KeyModifiers::NONE, Command::Activate);
        map.bind(KeyCode::Esc, KeyModifiers::NONE, Command::Cancel);
        map.bind(KeyCode::Up, KeyModifiers::NONE, Command::CursorUp);
        map.bind(KeyCode::Down, KeyModifiers::NONE, Command::CursorDown);
        map
    }
}

impl CommandMap {
    /// A map with no bindings at all.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a key to a command, replacing any previous binding of that key.
    pub fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, command: Command) {
        self.bindings.insert((code, modifiers), command);
    }

    /// Bind a key given by name (see [`parse_key`]).
    pub fn bind_name(&mut self, name: &str, command: Command) -> ConfigResult<()> {
        let (code, modifiers) = parse_key(name)?;
        self.bind(code, modifiers, command);
        Ok(())
    }

    /// Drop every binding that points at `command`.
    pub fn unbind_command(&mut self, command: Command) {
        self.bindings.retain(|_, c| *c != command);
    }

    /// Look up the command for a key event.
    pub fn command(&self, key: &KeyEvent) -> Option<Command> {
        let modifiers = match key.code {
            // Terminals report SHIFT alongside upper-case characters
            KeyCode::Char(_) => key.modifiers - KeyModifiers::SHIFT,
            _ => key.modifiers,
        };
        self.bindings.get(&(key.code, modifiers)).copied()
    }

    /// Shorthand for `command(key) == Some(command)`.
    pub fn is(&self, key: &KeyEvent, command: Command) -> bool {
        self.command(key) == Some(command)
    }
}

/// Parse a key name such as `"enter"`, `"space"`, `"ctrl-x"` or `"q"`.
pub fn parse_key(name: &str) -> ConfigResult<(KeyCode, KeyModifiers)> {
    let lower = name.trim().to_lowercase();

    if let Some(rest) = lower.strip_prefix("ctrl-") {
        let (code, modifiers) = parse_key(rest)?;
        return Ok((code, modifiers | KeyModifiers::CONTROL));
    }

    let code = match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "space" => KeyCode::Char(' '),
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        _ => {
            // Single characters keep their original case
            let mut chars = name.trim().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(ConfigError::UnknownKey(name.to_string())),
            }
        }
    };

    Ok((code, KeyModifiers::NONE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let map = CommandMap::default();
        assert!(map.is(&KeyEvent::from(KeyCode::Enter), Command::Activate));
        assert!(map.is(&KeyEvent::from(KeyCode::Char(' ')), Command::Activate));
        assert!(map.is(&KeyEvent::from(KeyCode::Esc), Command::Cancel));
        assert!(map.is(&KeyEvent::from(KeyCode::Up), Command::CursorUp));
        assert!(map.is(&KeyEvent::from(KeyCode::Down), Command::CursorDown));
        assert_eq!(map.command(&KeyEvent::from(KeyCode::Char('a'))), None);
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!(parse_key("Enter").unwrap(), (KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(parse_key("space").unwrap(), (KeyCode::Char(' '), KeyModifiers::NONE));
        assert_eq!(parse_key("Q").unwrap(), (KeyCode::Char('Q'), KeyModifiers::NONE));
        assert_eq!(
            parse_key("ctrl-o").unwrap(),
            (KeyCode::Char('o'), KeyModifiers::CONTROL)
        );
        assert!(matches!(parse_key("hyperspace"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn test_rebinding() {
        let mut map = CommandMap::default();
        map.unbind_command(Command::Activate);
        map.bind_name("ctrl-o", Command::Activate).unwrap();

        assert_eq!(map.command(&KeyEvent::from(KeyCode::Enter)), None);
        let ctrl_o = KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL);
        assert!(map.is(&ctrl_o, Command::Activate));
    }

    #[test]
    fn test_shift_ignored_for_chars() {
        let mut map = CommandMap::empty();
        map.bind_name("Y", Command::Activate).unwrap();
        let shifted = KeyEvent::new(KeyCode::Char('Y'), KeyModifiers::SHIFT);
        assert!(map.is(&shifted, Command::Activate));
    }
}
