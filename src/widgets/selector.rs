//! Pop-up single-choice selector.
//!
//! The collapsed `Selector` shows `"(+) "` followed by the current label.
//! Activating it opens a `PopUpSelectDialog` listing every option; picking a
//! row sets the selector's index and closes the dialog, escape closes it
//! without touching the index. The dialog is rebuilt on every open.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::error::{SelectorError, SelectorResult};
use crate::keys::{Command, CommandMap};
use crate::log;
use crate::signal::Signal;
use crate::tui::theme;

use super::{FormWidget, Pile, PopUpLauncher, PopUpParameters, Text};

/// A raw option as written by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionSpec<V> {
    /// Selectable, value is the label
    Label(String),
    /// Value is the label
    LabelSelectable(String, bool),
    LabelSelectableValue(String, bool, V),
}

impl<V> OptionSpec<V> {
    fn label(&self) -> &str {
        match self {
            OptionSpec::Label(label)
            | OptionSpec::LabelSelectable(label, _)
            | OptionSpec::LabelSelectableValue(label, _, _) => label,
        }
    }
}

impl<V: From<String>> OptionSpec<V> {
    /// Fill in the defaults: value falls back to the label, selectable to true.
    pub fn normalize(self) -> SelectorResult<SelectOption<V>> {
        if self.label().is_empty() {
            return Err(SelectorError::InvalidOption("with an empty label".to_string()));
        }

        let option = match self {
            OptionSpec::Label(label) => SelectOption {
                value: V::from(label.clone()),
                label,
                selectable: true,
            },
            OptionSpec::LabelSelectable(label, selectable) => SelectOption {
                value: V::from(label.clone()),
                label,
                selectable,
            },
            OptionSpec::LabelSelectableValue(label, selectable, value) => SelectOption {
                label,
                selectable,
                value,
            },
        };
        Ok(option)
    }
}

impl OptionSpec<toml::Value> {
    /// Read an option from configuration data.
    ///
    /// Accepts a bare string or an array of one to three elements:
    /// `[label]`, `[label, selectable]`, `[label, selectable, value]`.
    pub fn from_toml(raw: &toml::Value) -> SelectorResult<Self> {
        use toml::Value;

        let spec = match raw {
            Value::String(label) => OptionSpec::Label(label.clone()),
            Value::Array(items) => match items.as_slice() {
                [Value::String(label)] => OptionSpec::Label(label.clone()),
                [Value::String(label), Value::Boolean(selectable)] => {
                    OptionSpec::LabelSelectable(label.clone(), *selectable)
                }
                [Value::String(label), Value::Boolean(selectable), value] => {
                    OptionSpec::LabelSelectableValue(label.clone(), *selectable, value.clone())
                }
                _ => return Err(SelectorError::InvalidOption(raw.to_string())),
            },
            _ => return Err(SelectorError::InvalidOption(raw.to_string())),
        };
        Ok(spec)
    }
}

impl<V> From<&str> for OptionSpec<V> {
    fn from(label: &str) -> Self {
        OptionSpec::Label(label.to_string())
    }
}

impl<V> From<String> for OptionSpec<V> {
    fn from(label: String) -> Self {
        OptionSpec::Label(label)
    }
}

impl<V> From<(&str, bool)> for OptionSpec<V> {
    fn from((label, selectable): (&str, bool)) -> Self {
        OptionSpec::LabelSelectable(label.to_string(), selectable)
    }
}

impl<V> From<(&str, bool, V)> for OptionSpec<V> {
    fn from((label, selectable, value): (&str, bool, V)) -> Self {
        OptionSpec::LabelSelectableValue(label.to_string(), selectable, value)
    }
}

/// A normalized option.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption<V> {
    pub label: String,
    pub selectable: bool,
    pub value: V,
}

/// Result of feeding input to an open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Row `n` was picked
    Clicked(usize),
    /// Escape
    Dismissed,
    /// Still open (navigation or ignored input)
    Pending,
}

/// Radio-looking row of the dialog; emits `click` with its row index.
pub struct PopUpButton {
    index: usize,
    text: String,
    command_map: CommandMap,
    area: Option<Rect>,
    pub click: Signal<usize>,
}

impl PopUpButton {
    pub const CHECKED: &'static str = "(+) ";
    pub const UNCHECKED: &'static str = "( ) ";

    pub fn new(index: usize, label: &str, checked: bool, command_map: CommandMap) -> Self {
        let prefix = if checked { Self::CHECKED } else { Self::UNCHECKED };
        Self {
            index,
            text: format!("{}{}", prefix, label),
            command_map,
            area: None,
            click: Signal::new("click"),
        }
    }
}

impl FormWidget for PopUpButton {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        if !self.command_map.is(&key, Command::Activate) {
            return Some(key);
        }
        self.click.emit(&self.index);
        None
    }

    fn mouse_click(&mut self, column: u16, row: u16) -> bool {
        if self
            .area
            .is_some_and(|a| a.contains(Position::new(column, row)))
        {
            self.click.emit(&self.index);
            return true;
        }
        false
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        self.area = Some(area);
        let style = if focused {
            theme::menu_button_focus()
        } else {
            theme::menu_button()
        };
        frame.render_widget(Paragraph::new(Line::styled(self.text.as_str(), style)), area);
    }
}

/// The option list shown while a selector is open.
///
/// Holds no option data of its own beyond the rendered rows; picks are
/// reported back through `DialogOutcome`.
pub struct PopUpSelectDialog {
    pile: Pile,
    clicked: Rc<Cell<Option<usize>>>,
    command_map: CommandMap,
}

impl PopUpSelectDialog {
    pub fn new<V>(options: &[SelectOption<V>], cur_index: usize, command_map: &CommandMap) -> Self {
        let clicked = Rc::new(Cell::new(None));
        let mut rows: Vec<Box<dyn FormWidget>> = Vec::with_capacity(options.len());

        for (i, option) in options.iter().enumerate() {
            if option.selectable {
                let mut button =
                    PopUpButton::new(i, &option.label, i == cur_index, command_map.clone());
                let slot = clicked.clone();
                button.click.connect(move |index| slot.set(Some(*index)));
                rows.push(Box::new(button));
            } else {
                rows.push(Box::new(Text::styled(
                    format!("    {}", option.label),
                    theme::info_minor(),
                )));
            }
        }

        let mut pile = Pile::new(rows, command_map.clone());
        pile.set_focus(cur_index);

        Self {
            pile,
            clicked,
            command_map: command_map.clone(),
        }
    }

    /// Row that currently has focus.
    pub fn focus(&self) -> Option<usize> {
        self.pile.focus()
    }

    pub fn row_count(&self) -> usize {
        self.pile.len()
    }

    pub fn keypress(&mut self, key: KeyEvent) -> DialogOutcome {
        if self.command_map.is(&key, Command::Cancel) {
            return DialogOutcome::Dismissed;
        }
        self.pile.keypress(key);
        self.take_click()
    }

    pub fn mouse_click(&mut self, column: u16, row: u16) -> DialogOutcome {
        self.pile.mouse_click(column, row);
        self.take_click()
    }

    fn take_click(&self) -> DialogOutcome {
        match self.clicked.take() {
            Some(index) => DialogOutcome::Clicked(index),
            None => DialogOutcome::Pending,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::pop_up_border())
            .style(theme::pop_up_border());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.pile.render(frame, inner, true);
    }
}

/// A widget that lets the user choose between options by popping up a
/// list of them. A bit like `<select>` in an HTML form.
pub struct Selector<V> {
    options: Vec<SelectOption<V>>,
    index: usize,
    button_text: String,
    command_map: CommandMap,
    pop_up: Option<PopUpSelectDialog>,
    anchor: Option<Rect>,
    overlay: Option<Rect>,
    select: Signal<V>,
}

impl<V> Selector<V> {
    pub const PREFIX: &'static str = "(+) ";

    /// Build from raw option specs. See [`OptionSpec::normalize`].
    pub fn new<I, S>(options: I, index: usize) -> SelectorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OptionSpec<V>>,
        V: From<String>,
    {
        let options = options
            .into_iter()
            .map(|spec| spec.into().normalize())
            .collect::<SelectorResult<Vec<_>>>()?;
        Self::from_options(options, index)
    }

    /// Build from already normalized options. No `select` is emitted for
    /// the initial index.
    pub fn from_options(options: Vec<SelectOption<V>>, index: usize) -> SelectorResult<Self> {
        if options.is_empty() {
            return Err(SelectorError::Empty);
        }
        check_index(index, options.len())?;
        Ok(Self::build(options, index))
    }

    /// Callers guarantee `options` is non-empty and `index` is in range.
    fn build(options: Vec<SelectOption<V>>, index: usize) -> Self {
        let button_text = format!("{}{}", Self::PREFIX, options[index].label);
        Self {
            options,
            index,
            button_text,
            command_map: CommandMap::default(),
            pop_up: None,
            anchor: None,
            overlay: None,
            select: Signal::new("select"),
        }
    }

    pub fn with_command_map(mut self, command_map: CommandMap) -> Self {
        self.command_map = command_map;
        self
    }

    pub fn options(&self) -> &[SelectOption<V>] {
        &self.options
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Change the selection and emit `select` with the new value.
    ///
    /// State and button text are updated before listeners run, so a listener
    /// sees the new index and label.
    pub fn set_index(&mut self, index: usize) -> SelectorResult<()> {
        check_index(index, self.options.len())?;

        self.index = index;
        self.button_text = format!("{}{}", Self::PREFIX, self.options[index].label);
        log::log_event(&format!("selector select index={} label={:?}", index, self.options[index].label));
        self.select.emit(&self.options[index].value);
        Ok(())
    }

    pub fn value(&self) -> &V {
        &self.options[self.index].value
    }

    /// Text of the collapsed button.
    pub fn button_text(&self) -> &str {
        &self.button_text
    }

    /// Register a listener for the `select` signal.
    pub fn on_select<F>(&mut self, listener: F)
    where
        F: FnMut(&V) + 'static,
    {
        self.select.connect(listener);
    }

    pub fn is_open(&self) -> bool {
        self.pop_up.is_some()
    }

    pub fn pop_up(&self) -> Option<&PopUpSelectDialog> {
        self.pop_up.as_ref()
    }

    pub fn open_pop_up(&mut self) {
        log::log_event(&format!("selector open index={}", self.index));
        self.pop_up = Some(self.create_pop_up());
    }

    pub fn close_pop_up(&mut self) {
        if self.pop_up.take().is_some() {
            log::log_event("selector close");
        }
        self.overlay = None;
    }

    fn apply(&mut self, outcome: DialogOutcome) {
        match outcome {
            DialogOutcome::Clicked(index) => {
                if let Err(e) = self.set_index(index) {
                    log::log(&format!("selector: {}", e));
                }
                self.close_pop_up();
            }
            DialogOutcome::Dismissed => self.close_pop_up(),
            DialogOutcome::Pending => {}
        }
    }
}

fn check_index(index: usize, len: usize) -> SelectorResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(SelectorError::IndexOutOfRange { index, len })
    }
}

impl<V> PopUpLauncher for Selector<V> {
    type PopUp = PopUpSelectDialog;

    fn create_pop_up(&self) -> PopUpSelectDialog {
        PopUpSelectDialog::new(&self.options, self.index, &self.command_map)
    }

    fn pop_up_parameters(&self) -> PopUpParameters {
        let longest = self
            .options
            .iter()
            .map(|o| o.label.chars().count())
            .max()
            .unwrap_or(0);
        // line on left, space, line on right
        let width = longest
            .saturating_add(Self::PREFIX.chars().count())
            .saturating_add(3);
        let rows = u16::try_from(self.options.len()).unwrap_or(u16::MAX);

        PopUpParameters {
            left: -1,
            top: i32::try_from(self.index).map_or(i32::MIN, |i| -i - 1),
            overlay_width: u16::try_from(width).unwrap_or(u16::MAX),
            overlay_height: rows.saturating_add(2),
        }
    }
}

impl<V> FormWidget for Selector<V> {
    fn keypress(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        if let Some(dialog) = self.pop_up.as_mut() {
            // Modal while open
            let outcome = dialog.keypress(key);
            self.apply(outcome);
            return None;
        }

        if !self.command_map.is(&key, Command::Activate) {
            return Some(key);
        }
        self.open_pop_up();
        None
    }

    fn mouse_click(&mut self, column: u16, row: u16) -> bool {
        let point = Position::new(column, row);

        if let Some(dialog) = self.pop_up.as_mut() {
            if self.overlay.is_some_and(|a| a.contains(point)) {
                let outcome = dialog.mouse_click(column, row);
                self.apply(outcome);
            }
            return true;
        }

        if self.anchor.is_some_and(|a| a.contains(point)) {
            self.open_pop_up();
            return true;
        }
        false
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        self.anchor = Some(area);
        let line = Line::styled(self.button_text.as_str(), theme::selector_button(focused));
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_overlay(&mut self, frame: &mut Frame, bounds: Rect) {
        let Some(anchor) = self.anchor else {
            return;
        };
        let area = self.overlay_area(anchor, bounds);
        if let Some(dialog) = self.pop_up.as_mut() {
            dialog.render(frame, area);
            self.overlay = Some(area);
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Selector<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("options", &self.options)
            .field("index", &self.index)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Selector<String> {
    /// Yes/No selector, starting on "Yes".
    pub fn yes_no() -> Self {
        let options = ["Yes", "No"]
            .into_iter()
            .map(|label| SelectOption {
                label: label.to_string(),
                selectable: true,
                value: label.to_string(),
            })
            .collect();
        Self::build(options, 0)
    }
}
