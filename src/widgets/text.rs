//! Non-interactive label rows.

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect, style::Style, text::Line, widgets::Paragraph};

use super::FormWidget;

/// A line of static text. Never takes focus.
#[derive(Debug, Clone)]
pub struct Text {
    text: String,
    style: Style,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

impl FormWidget for Text {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        Some(key)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _focused: bool) {
        let line = Line::styled(self.text.as_str(), self.style);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn selectable(&self) -> bool {
        false
    }
}
