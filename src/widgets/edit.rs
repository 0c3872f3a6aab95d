//! Text editing primitives.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::theme;

use super::FormWidget;

/// Single-line text editor with a caption and an optional mask glyph.
///
/// The cursor is tracked in characters, not bytes.
#[derive(Debug, Clone, Default)]
pub struct Edit {
    caption: String,
    text: String,
    cursor: usize,
    mask: Option<char>,
    area: Option<Rect>,
}

impl Edit {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            ..Self::default()
        }
    }

    /// Render every character of the text as `mask`.
    pub fn with_mask(mut self, mask: char) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole text and move the cursor to its end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Insert one character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Text as it appears on screen.
    pub fn display_text(&self) -> String {
        match self.mask {
            Some(mask) => std::iter::repeat_n(mask, self.text.chars().count()).collect(),
            None => self.text.clone(),
        }
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_offset(self.cursor - 1);
            self.text.remove(at);
            self.cursor -= 1;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_offset(self.cursor);
            self.text.remove(at);
        }
    }

    /// Draw the caption and text, styling the text with `text_style`.
    pub fn render_styled(&mut self, frame: &mut Frame, area: Rect, focused: bool, text_style: Style) {
        self.area = Some(area);

        let line = Line::from(vec![
            Span::styled(self.caption.as_str(), theme::caption()),
            Span::styled(self.display_text(), text_style),
        ]);
        frame.render_widget(Paragraph::new(line), area);

        if focused && area.height > 0 {
            frame.set_cursor_position(Position::new(self.cursor_column(area), area.y));
        }
    }

    fn caption_width(&self) -> u16 {
        u16::try_from(self.caption.chars().count()).unwrap_or(u16::MAX)
    }

    /// Terminal column of the cursor, kept inside `area`.
    fn cursor_column(&self, area: Rect) -> u16 {
        let cursor = u16::try_from(self.cursor).unwrap_or(u16::MAX);
        area.x
            .saturating_add(self.caption_width())
            .saturating_add(cursor)
            .min(area.right().saturating_sub(1))
    }

    /// Cursor position for a click at terminal `column`.
    fn cursor_at_column(&self, area: Rect, column: u16) -> usize {
        let text_start = area.x.saturating_add(self.caption_width());
        usize::from(column.saturating_sub(text_start)).min(self.char_count())
    }
}

impl FormWidget for Edit {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Some(key);
        }

        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left if self.cursor > 0 => self.cursor -= 1,
            KeyCode::Right if self.cursor < self.char_count() => self.cursor += 1,
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_count(),
            _ => return Some(key),
        }
        None
    }

    fn mouse_click(&mut self, column: u16, row: u16) -> bool {
        let Some(area) = self.area else {
            return false;
        };
        if !area.contains(Position::new(column, row)) {
            return false;
        }

        self.cursor = self.cursor_at_column(area, column);
        true
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        self.render_styled(frame, area, focused, Style::new().fg(theme::TEXT_WHITE));
    }
}

/// Edit that only accepts decimal digits.
#[derive(Debug, Clone)]
pub struct IntEdit {
    edit: Edit,
}

impl IntEdit {
    pub fn new(caption: impl Into<String>, default: i64) -> Self {
        let mut edit = Edit::new(caption);
        edit.set_text(default.to_string());
        Self { edit }
    }

    pub fn text(&self) -> &str {
        self.edit.text()
    }
}

impl FormWidget for IntEdit {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        match key.code {
            KeyCode::Char(c) if !c.is_ascii_digit() => Some(key),
            _ => self.edit.keypress(key),
        }
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

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_insert_and_edit() {
        let mut edit = Edit::new("Name: ");
        for c in "helo".chars() {
            assert!(edit.keypress(key(KeyCode::Char(c))).is_none());
        }
        edit.keypress(key(KeyCode::Left));
        edit.keypress(key(KeyCode::Char('l')));
        assert_eq!(edit.text(), "hello");
        assert_eq!(edit.cursor(), 4);

        edit.keypress(key(KeyCode::Home));
        edit.keypress(key(KeyCode::Delete));
        assert_eq!(edit.text(), "ello");

        edit.keypress(key(KeyCode::End));
        edit.keypress(key(KeyCode::Backspace));
        assert_eq!(edit.text(), "ell");
    }

    #[test]
    fn test_multibyte_cursor() {
        let mut edit = Edit::new("");
        edit.set_text("für");
        edit.keypress(key(KeyCode::Left));
        edit.keypress(key(KeyCode::Left));
        edit.insert_char('ü');
        assert_eq!(edit.text(), "füür");
    }

    #[test]
    fn test_unhandled_keys_propagate() {
        let mut edit = Edit::new("");
        assert!(edit.keypress(key(KeyCode::Up)).is_some());
        assert!(edit.keypress(key(KeyCode::Enter)).is_some());
        assert!(edit.keypress(key(KeyCode::Esc)).is_some());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(edit.keypress(ctrl_c).is_some());
        assert_eq!(edit.text(), "");
    }

    #[test]
    fn test_mask() {
        let mut edit = Edit::new("Password: ").with_mask('*');
        edit.set_text("hunter2");
        assert_eq!(edit.display_text(), "*******");
        assert_eq!(edit.text(), "hunter2");
    }

    #[test]
    fn test_cursor_column_stays_in_area() {
        let mut edit = Edit::new("x".repeat(70_000));
        edit.set_text("y".repeat(70_000));
        assert_eq!(edit.cursor_column(Rect::new(0, 0, 20, 1)), 19);
        assert_eq!(edit.cursor_column(Rect::new(65_000, 0, 535, 1)), 65_534);

        let mut short = Edit::new("Name: ");
        short.set_text("ab");
        assert_eq!(short.cursor_column(Rect::new(3, 0, 40, 1)), 11);
    }

    #[test]
    fn test_click_moves_cursor() {
        let mut edit = Edit::new("Name: ");
        edit.set_text("abcdef");
        let area = Rect::new(2, 0, 40, 1);
        assert_eq!(edit.cursor_at_column(area, 10), 2);
        assert_eq!(edit.cursor_at_column(area, 1), 0);
        assert_eq!(edit.cursor_at_column(area, 39), 6);

        let long = Edit::new("x".repeat(70_000));
        assert_eq!(long.cursor_at_column(Rect::new(65_000, 0, 535, 1), 65_534), 0);
    }

    #[test]
    fn test_long_caption_renders() {
        use ratatui::{Terminal, backend::TestBackend};

        let mut edit = Edit::new("x".repeat(70_000));
        edit.set_text("y".repeat(10));
        let mut terminal = Terminal::new(TestBackend::new(20, 1)).unwrap();
        terminal
            .draw(|frame| edit.render(frame, frame.area(), true))
            .unwrap();
        assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(19, 0));
    }

    #[test]
    fn test_int_edit_digits_only() {
        let mut edit = IntEdit::new("Size: ", 10);
        assert_eq!(edit.text(), "10");
        assert!(edit.keypress(key(KeyCode::Char('a'))).is_some());
        assert!(edit.keypress(key(KeyCode::Char('5'))).is_none());
        assert_eq!(edit.text(), "105");
    }
}
