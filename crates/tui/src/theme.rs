//! Colors and styles of the form host.

use ratatui::style::{Color, Modifier, Style};

/// Accent used for focus and key hints.
pub const ACCENT: Color = Color::Rgb(8, 171, 237);

pub const FG: Color = Color::Rgb(224, 224, 230);

/// Secondary text: hints, tooltips, disabled rows.
pub const FG_MUTED: Color = Color::Rgb(168, 168, 175);

pub const BORDER: Color = Color::Rgb(72, 72, 80);

pub const BG_HIGHLIGHT: Color = Color::Rgb(20, 32, 44);

/// Validation failures and fill errors.
pub const WARN: Color = Color::Rgb(220, 96, 110);

pub const OK: Color = Color::Rgb(120, 200, 140);

pub fn border_style(focused: bool) -> Style {
    if focused { Style::default().fg(ACCENT) } else { Style::default().fg(BORDER) }
}

pub fn title_style() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::BOLD)
}

pub fn text_style() -> Style {
    Style::default().fg(FG)
}

pub fn text_muted() -> Style {
    Style::default().fg(FG_MUTED)
}

/// Focused editor row.
pub fn highlight_style() -> Style {
    Style::default().fg(FG).bg(BG_HIGHLIGHT)
}

/// Cursor item inside a list editor.
pub fn list_highlight_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn disabled_style() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::DIM)
}

pub fn key_style() -> Style {
    title_style().fg(ACCENT)
}

pub fn error_style() -> Style {
    Style::default().fg(WARN)
}

pub fn info_style() -> Style {
    Style::default().fg(OK)
}
