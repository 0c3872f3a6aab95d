//! Interactive form widgets for text-mode installers.
//!
//! Editors with per-keystroke character filters and a pop-up single-choice
//! `Selector`, drawn with ratatui and driven by crossterm key events.

pub mod config;
pub mod error;
pub mod keys;
pub mod log;
pub mod signal;
pub mod tui;
pub mod widgets;

pub use config::Config;
pub use error::{FormError, Result, SelectorError};
pub use keys::{Command, CommandMap};
pub use signal::Signal;
pub use widgets::{FormWidget, Pile, Selector};
