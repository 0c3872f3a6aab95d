use ratatui::style::{Color, Modifier, Style};

// Palette (circumflex-inspired)
pub const ACCENT_CORAL: Color = Color::Rgb(232, 131, 136);    // #E88388
pub const ACCENT_GOLD: Color = Color::Rgb(219, 171, 121);     // #DBAB79
pub const ACCENT_BLUE: Color = Color::Rgb(124, 175, 194);     // #7CAFC2
pub const ACCENT_MINT: Color = Color::Rgb(161, 193, 129);     // #A1C181

// UI colors
pub const TEXT_DIM: Color = Color::Rgb(136, 136, 136);        // #888888
pub const TEXT_WHITE: Color = Color::Rgb(255, 255, 255);      // #FFFFFF

/// Selectable row in a pop-up menu
pub fn menu_button() -> Style {
    Style::new().fg(TEXT_WHITE)
}

/// Focused selectable row in a pop-up menu
pub fn menu_button_focus() -> Style {
    Style::new().fg(Color::Black).bg(ACCENT_BLUE)
}

/// Informational, non-selectable text
pub fn info_minor() -> Style {
    Style::new().fg(TEXT_DIM)
}

/// Edit captions
pub fn caption() -> Style {
    Style::new().fg(TEXT_DIM)
}

/// Error text shown inside an editor
pub fn error() -> Style {
    Style::new().fg(ACCENT_CORAL).add_modifier(Modifier::ITALIC)
}

/// Border of pop-up overlays
pub fn pop_up_border() -> Style {
    Style::new().fg(ACCENT_GOLD).bg(Color::Black)
}

/// Collapsed selector button
pub fn selector_button(focused: bool) -> Style {
    if focused {
        Style::new().fg(ACCENT_MINT).add_modifier(Modifier::BOLD)
    } else {
        Style::new().fg(TEXT_WHITE)
    }
}
