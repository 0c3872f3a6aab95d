//! Vertical container with a single focused child.

use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Position, Rect},
};

use crate::keys::{Command, CommandMap};

use super::FormWidget;

/// Stacks children top to bottom and routes keys to the focused one.
///
/// Keys the focused child leaves unhandled are checked against the command
/// map: `CursorUp`/`CursorDown` move focus between selectable children.
pub struct Pile {
    children: Vec<Box<dyn FormWidget>>,
    focus: Option<usize>,
    command_map: CommandMap,
    areas: Vec<Option<Rect>>,
}

impl Pile {
    pub fn new(children: Vec<Box<dyn FormWidget>>, command_map: CommandMap) -> Self {
        let focus = children.iter().position(|c| c.selectable());
        let areas = vec![None; children.len()];
        Self {
            children,
            focus,
            command_map,
            areas,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the focused child.
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Focus child `index`, selectable or not. Out-of-range indices are ignored.
    pub fn set_focus(&mut self, index: usize) {
        if index < self.children.len() {
            self.focus = Some(index);
        }
    }

    /// Move focus to the next selectable child. Returns false at the bottom.
    pub fn focus_next(&mut self) -> bool {
        let start = self.focus.map(|f| f + 1).unwrap_or(0);
        match (start..self.children.len()).find(|&i| self.children[i].selectable()) {
            Some(i) => {
                self.focus = Some(i);
                true
            }
            None => false,
        }
    }

    /// Move focus to the previous selectable child. Returns false at the top.
    pub fn focus_prev(&mut self) -> bool {
        let end = self.focus.unwrap_or(self.children.len());
        match (0..end).rev().find(|&i| self.children[i].selectable()) {
            Some(i) => {
                self.focus = Some(i);
                true
            }
            None => false,
        }
    }

    /// First child to draw so the focused child stays visible in `height` rows.
    fn first_visible(&self, height: u16) -> usize {
        let Some(focus) = self.focus else {
            return 0;
        };
        let mut first = 0;
        while first < focus {
            let used: u16 = self.children[first..=focus]
                .iter()
                .map(|c| c.height())
                .sum();
            if used <= height {
                break;
            }
            first += 1;
        }
        first
    }
}

impl FormWidget for Pile {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        let unhandled = match self.focus {
            Some(i) => self.children[i].keypress(key)?,
            None => key,
        };

        let moved = match self.command_map.command(&unhandled) {
            Some(Command::CursorUp) => self.focus_prev(),
            Some(Command::CursorDown) => self.focus_next(),
            _ => false,
        };

        if moved { None } else { Some(unhandled) }
    }

    fn mouse_click(&mut self, column: u16, row: u16) -> bool {
        // The focused child may own an overlay drawn outside its own area
        if let Some(i) = self.focus
            && self.children[i].mouse_click(column, row)
        {
            return true;
        }

        let point = Position::new(column, row);
        let hit = self
            .areas
            .iter()
            .position(|a| a.is_some_and(|a| a.contains(point)));

        match hit {
            Some(i) if self.children[i].selectable() => {
                self.focus = Some(i);
                self.children[i].mouse_click(column, row);
                true
            }
            _ => false,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let first = self.first_visible(area.height);
        let mut y = area.y;

        for (i, child) in self.children.iter_mut().enumerate() {
            let height = child.height();
            if i < first || y >= area.bottom() {
                self.areas[i] = None;
                continue;
            }

            let child_area = Rect::new(area.x, y, area.width, height.min(area.bottom() - y));
            child.render(frame, child_area, focused && self.focus == Some(i));
            self.areas[i] = Some(child_area);
            y += height;
        }
    }

    fn render_overlay(&mut self, frame: &mut Frame, bounds: Rect) {
        for child in self.children.iter_mut() {
            child.render_overlay(frame, bounds);
        }
    }

    fn selectable(&self) -> bool {
        self.children.iter().any(|c| c.selectable())
    }

    fn height(&self) -> u16 {
        self.children.iter().map(|c| c.height()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Edit, Text};
    use crossterm::event::KeyCode;

    fn form() -> Pile {
        Pile::new(
            vec![
                Box::new(Text::new("Header")),
                Box::new(Edit::new("A: ")),
                Box::new(Text::new("--")),
                Box::new(Edit::new("B: ")),
            ],
            CommandMap::default(),
        )
    }

    #[test]
    fn test_initial_focus_skips_text() {
        assert_eq!(form().focus(), Some(1));
    }

    #[test]
    fn test_cursor_keys_move_between_selectable_children() {
        let mut pile = form();

        assert!(pile.keypress(KeyEvent::from(KeyCode::Down)).is_none());
        assert_eq!(pile.focus(), Some(3));

        // Already at the bottom: key goes back to the caller
        assert!(pile.keypress(KeyEvent::from(KeyCode::Down)).is_some());
        assert_eq!(pile.focus(), Some(3));

        assert!(pile.keypress(KeyEvent::from(KeyCode::Up)).is_none());
        assert_eq!(pile.focus(), Some(1));
        assert!(pile.keypress(KeyEvent::from(KeyCode::Up)).is_some());
    }

    #[test]
    fn test_keys_reach_focused_child_first() {
        let mut pile = form();
        assert!(pile.keypress(KeyEvent::from(KeyCode::Char('x'))).is_none());
        assert!(pile.keypress(KeyEvent::from(KeyCode::Enter)).is_some());
    }

    #[test]
    fn test_set_focus_any_child() {
        let mut pile = form();
        pile.set_focus(0);
        assert_eq!(pile.focus(), Some(0));
        pile.set_focus(42);
        assert_eq!(pile.focus(), Some(0));
    }

    #[test]
    fn test_empty_pile() {
        let mut pile = Pile::new(Vec::new(), CommandMap::default());
        assert!(pile.is_empty());
        assert_eq!(pile.focus(), None);
        assert!(!pile.selectable());
        assert!(pile.keypress(KeyEvent::from(KeyCode::Down)).is_some());

        let pile = form();
        assert!(!pile.is_empty());
        assert_eq!(pile.len(), 4);
    }

    #[test]
    fn test_height_and_visibility() {
        let mut pile = form();
        assert_eq!(pile.height(), 4);
        pile.set_focus(3);
        assert_eq!(pile.first_visible(2), 2);
        assert_eq!(pile.first_visible(10), 0);
    }
}
