//! Form editors built on `Edit`.
//!
//! The filtered editors check every typed character against a one-character
//! pattern before the key reaches the edit; anything that does not match is
//! swallowed. Non-character keys (arrows, backspace, ...) are not filtered.

use std::ops::{Deref, DerefMut};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use once_cell::sync::Lazy;
use ratatui::{Frame, layout::Rect, style::Style};
use regex::Regex;

use crate::log;
use crate::tui::theme;

use super::{Edit, FormWidget, IntEdit};

static REALNAME: Lazy<CharFilter> = Lazy::new(|| CharFilter::new(r"[a-zA-Z0-9_\- ]"));
static EMAIL: Lazy<CharFilter> = Lazy::new(|| CharFilter::new(r"[-a-zA-Z0-9_.@+=]"));
static USERNAME_FIRST: Lazy<CharFilter> = Lazy::new(|| CharFilter::new(r"[a-z_]"));
static USERNAME_REST: Lazy<CharFilter> = Lazy::new(|| CharFilter::new(r"[a-z0-9_-]"));

/// Allow-list of single characters.
#[derive(Debug, Clone)]
pub struct CharFilter {
    pattern: Regex,
}

impl CharFilter {
    /// Build from a character class such as `[a-z]`.
    ///
    /// Panics on an invalid pattern; classes are compile-time constants.
    pub fn new(class: &str) -> Self {
        let pattern = Regex::new(&format!("^{}$", class)).unwrap();
        Self { pattern }
    }

    pub fn allows_char(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.pattern.is_match(c.encode_utf8(&mut buf))
    }

    /// Whether `key` may reach the editor. Only plain character keys are
    /// checked.
    pub fn allows(&self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.allows_char(c)
            }
            _ => true,
        }
    }
}

/// Plain string editor with an error display mode.
///
/// `set_error` puts the message into the field; the next keystroke clears it
/// and is then handled normally.
#[derive(Debug, Clone)]
pub struct StringEditor {
    edit: Edit,
    error: Option<String>,
}

impl StringEditor {
    pub fn new(caption: impl Into<String>) -> Self {
        Self::from_edit(Edit::new(caption))
    }

    fn from_edit(edit: Edit) -> Self {
        Self { edit, error: None }
    }

    pub fn value(&self) -> &str {
        self.edit.text()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.edit.set_text(value);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        self.edit.set_text(msg.clone());
        self.error = Some(msg);
    }

    pub fn edit(&self) -> &Edit {
        &self.edit
    }
}

impl FormWidget for StringEditor {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        if self.error.take().is_some() {
            self.edit.set_text("");
        }
        self.edit.keypress(key)
    }

    fn mouse_click(&mut self, column: u16, row: u16) -> bool {
        self.edit.mouse_click(column, row)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let style = if self.error.is_some() {
            theme::error()
        } else {
            Style::new().fg(theme::TEXT_WHITE)
        };
        self.edit.render_styled(frame, area, focused, style);
    }
}

/// Run `key` through `filter`, then through the editor.
fn filtered_keypress(
    editor: &mut StringEditor,
    filter: &CharFilter,
    name: &str,
    key: KeyEvent,
) -> Option<KeyEvent> {
    if !filter.allows(&key) {
        log::log_rejected(name, &key.code);
        return None;
    }
    editor.keypress(key)
}

macro_rules! string_editor_newtype {
    ($name:ident) => {
        impl Deref for $name {
            type Target = StringEditor;

            fn deref(&self) -> &StringEditor {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut StringEditor {
                &mut self.0
            }
        }
    };
}

/// Password input with masking
#[derive(Debug, Clone)]
pub struct PasswordEditor(StringEditor);

string_editor_newtype!(PasswordEditor);

impl PasswordEditor {
    pub fn new(caption: impl Into<String>, mask: char) -> Self {
        Self(StringEditor::from_edit(Edit::new(caption).with_mask(mask)))
    }
}

impl FormWidget for PasswordEditor {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        self.0.keypress(key)
    }

    fn mouse_click(&mut self, column: u16, row: u16) -> bool {
        self.0.mouse_click(column, row)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        self.0.render(frame, area, focused);
    }
}

/// Real name input: letters, digits, underscore, hyphen, space
#[derive(Debug, Clone)]
pub struct RealnameEditor(StringEditor);

string_editor_newtype!(RealnameEditor);

impl RealnameEditor {
    pub fn new(caption: impl Into<String>) -> Self {
        Self(StringEditor::new(caption))
    }
}

impl FormWidget for RealnameEditor {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        filtered_keypress(&mut self.0, &REALNAME, "realname", key)
    }

    fn mouse_click(&mut self, column: u16, row: u16) -> bool {
        self.0.mouse_click(column, row)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        self.0.render(frame, area, focused);
    }
}

/// Email input: letters, digits and `_ . @ + = -`
#[derive(Debug, Clone)]
pub struct EmailEditor(StringEditor);

string_editor_newtype!(EmailEditor);

impl EmailEditor {
    pub fn new(caption: impl Into<String>) -> Self {
        Self(StringEditor::new(caption))
    }
}

impl FormWidget for EmailEditor {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        filtered_keypress(&mut self.0, &EMAIL, "email", key)
    }

    fn mouse_click(&mut self, column: u16, row: u16) -> bool {
        self.0.mouse_click(column, row)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        self.0.render(frame, area, focused);
    }
}

/// Username input.
///
/// The first character must be `[a-z_]`; after that `[a-z0-9_-]`.
#[derive(Debug, Clone)]
pub struct UsernameEditor(StringEditor);

string_editor_newtype!(UsernameEditor);

impl UsernameEditor {
    pub fn new(caption: impl Into<String>) -> Self {
        Self(StringEditor::new(caption))
    }
}

impl FormWidget for UsernameEditor {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        let filter: &CharFilter = if self.value().is_empty() {
            &*USERNAME_FIRST
        } else {
            &*USERNAME_REST
        };
        filtered_keypress(&mut self.0, filter, "username", key)
    }

    fn mouse_click(&mut self, column: u16, row: u16) -> bool {
        self.0.mouse_click(column, row)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        self.0.render(frame, area, focused);
    }
}

/// Integer input. The value stays text; parsing is up to the caller.
#[derive(Debug, Clone)]
pub struct IntegerEditor {
    edit: IntEdit,
}

impl IntegerEditor {
    pub fn new(caption: impl Into<String>, default: i64) -> Self {
        Self {
            edit: IntEdit::new(caption, default),
        }
    }

    pub fn value(&self) -> &str {
        self.edit.text()
    }
}

impl FormWidget for IntegerEditor {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        self.edit.keypress(key)
    }

    fn mouse_click(&mut self, column: u16, row: u16) -> bool {
        self.edit.mouse_click(column, row)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        self.edit.render(frame, area, focused);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(c: char) -> KeyEvent {
        KeyEvent::from(KeyCode::Char(c))
    }

    fn type_str<W: FormWidget>(widget: &mut W, s: &str) {
        for c in s.chars() {
            widget.keypress(ch(c));
        }
    }

    #[test]
    fn test_error_cleared_by_next_keystroke() {
        let mut editor = StringEditor::new("Host: ");
        editor.set_value("old");
        editor.set_error("invalid hostname");
        assert_eq!(editor.value(), "invalid hostname");
        assert_eq!(editor.error(), Some("invalid hostname"));

        editor.keypress(ch('a'));
        assert_eq!(editor.value(), "a");
        assert_eq!(editor.error(), None);
    }

    #[test]
    fn test_error_cleared_by_navigation_key() {
        let mut editor = StringEditor::new("");
        editor.set_error("required");
        assert!(editor.keypress(KeyEvent::from(KeyCode::Down)).is_some());
        assert_eq!(editor.value(), "");
        assert_eq!(editor.error(), None);
    }

    #[test]
    fn test_password_masks() {
        let mut editor = PasswordEditor::new("Password: ", '*');
        type_str(&mut editor, "s3cret");
        assert_eq!(editor.value(), "s3cret");
        assert_eq!(editor.edit().display_text(), "******");
    }

    #[test]
    fn test_realname_filter() {
        let mut editor = RealnameEditor::new("Name: ");
        assert!(editor.keypress(ch('$')).is_none());
        assert_eq!(editor.value(), "");

        type_str(&mut editor, "a_ B-9");
        assert_eq!(editor.value(), "a_ B-9");

        type_str(&mut editor, "!é");
        assert_eq!(editor.value(), "a_ B-9");
    }

    #[test]
    fn test_email_filter() {
        let mut editor = EmailEditor::new("Email: ");
        type_str(&mut editor, "a.b+c=d@ex-ample.com");
        assert_eq!(editor.value(), "a.b+c=d@ex-ample.com");

        type_str(&mut editor, " #,");
        assert_eq!(editor.value(), "a.b+c=d@ex-ample.com");
    }

    #[test]
    fn test_username_first_char() {
        let mut editor = UsernameEditor::new("User: ");
        for rejected in ['1', '-', 'A'] {
            editor.keypress(ch(rejected));
            assert_eq!(editor.value(), "", "{} accepted as first char", rejected);
        }
        editor.keypress(ch('_'));
        assert_eq!(editor.value(), "_");

        let mut editor = UsernameEditor::new("User: ");
        editor.keypress(ch('a'));
        assert_eq!(editor.value(), "a");
    }

    #[test]
    fn test_username_rest() {
        let mut editor = UsernameEditor::new("User: ");
        type_str(&mut editor, "ab1-_");
        assert_eq!(editor.value(), "ab1-_");

        type_str(&mut editor, "Z.");
        assert_eq!(editor.value(), "ab1-_");
    }

    #[test]
    fn test_filter_passes_editing_keys() {
        let mut editor = UsernameEditor::new("User: ");
        type_str(&mut editor, "bob");
        assert!(editor.keypress(KeyEvent::from(KeyCode::Backspace)).is_none());
        assert!(editor.keypress(KeyEvent::from(KeyCode::Left)).is_none());
        assert_eq!(editor.value(), "bo");
        assert!(editor.keypress(KeyEvent::from(KeyCode::Up)).is_some());
    }

    #[test]
    fn test_integer_editor_value_is_text() {
        let mut editor = IntegerEditor::new("Size: ", 0);
        assert_eq!(editor.value(), "0");
        editor.keypress(KeyEvent::from(KeyCode::Backspace));
        type_str(&mut editor, "4x2");
        assert_eq!(editor.value(), "42");
    }
}
