//! Form widgets and the small toolkit they are built on.
//!
//! # Organization
//!
//! - `edit` - Text editing primitives (`Edit`, `IntEdit`)
//! - `text` - Non-interactive label rows
//! - `pile` - Vertical container with one focused child
//! - `popup` - Pop-up launcher contract and overlay placement
//! - `selector` - Pop-up single-choice `Selector` and its dialog
//! - `editors` - Filtered string editors and the integer editor

mod edit;
mod editors;
mod pile;
mod popup;
mod selector;
mod text;

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

pub use edit::{Edit, IntEdit};
pub use editors::{
    CharFilter, EmailEditor, IntegerEditor, PasswordEditor, RealnameEditor, StringEditor,
    UsernameEditor,
};
pub use pile::Pile;
pub use popup::{PopUpLauncher, PopUpParameters};
pub use selector::{
    DialogOutcome, OptionSpec, PopUpButton, PopUpSelectDialog, SelectOption, Selector,
};
pub use text::Text;

/// Behaviour shared by every widget that can live in a form.
pub trait FormWidget {
    /// Handle a key press.
    ///
    /// Returns `None` when the key was consumed (or deliberately swallowed)
    /// and `Some(key)` when it should propagate to the enclosing widget.
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent>;

    /// Handle a left click at an absolute terminal cell. Returns whether the
    /// click was consumed.
    fn mouse_click(&mut self, _column: u16, _row: u16) -> bool {
        false
    }

    /// Draw the widget into `area`.
    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool);

    /// Draw anything that floats above sibling widgets (pop-ups).
    fn render_overlay(&mut self, _frame: &mut Frame, _bounds: Rect) {}

    /// Whether the widget can take focus.
    fn selectable(&self) -> bool {
        true
    }

    /// Rows the widget occupies.
    fn height(&self) -> u16 {
        1
    }
}

/// Shared handle: lets the host keep access to a widget placed in a `Pile`.
impl<W: FormWidget> FormWidget for std::rc::Rc<std::cell::RefCell<W>> {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        self.borrow_mut().keypress(key)
    }

    fn mouse_click(&mut self, column: u16, row: u16) -> bool {
        self.borrow_mut().mouse_click(column, row)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        self.borrow_mut().render(frame, area, focused);
    }

    fn render_overlay(&mut self, frame: &mut Frame, bounds: Rect) {
        self.borrow_mut().render_overlay(frame, bounds);
    }

    fn selectable(&self) -> bool {
        self.borrow().selectable()
    }

    fn height(&self) -> u16 {
        self.borrow().height()
    }
}
