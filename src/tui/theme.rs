//! Colors and styles for the evaluator screens.
//!
//! Clinical blue with an amber accent. Views take styles from here rather
//! than building `Style` values inline.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use super::events::NotificationLevel;

pub const PRIMARY: Color = Color::Rgb(0x15, 0x65, 0xC0);
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x4F, 0xC3, 0xF7);
pub const ACCENT: Color = Color::Rgb(0xFF, 0xB3, 0x00);
/// Badge foreground.
pub const INK: Color = Color::Rgb(0x06, 0x14, 0x24);

pub const TEXT: Color = Color::Rgb(0xEC, 0xEF, 0xF1);
pub const TEXT_MUTED: Color = Color::Rgb(0x90, 0xA4, 0xAE);
pub const TEXT_DIM: Color = Color::Rgb(0x54, 0x6E, 0x7A);

pub const ERROR: Color = Color::Rgb(0xE5, 0x39, 0x35);
pub const SUCCESS: Color = Color::Rgb(0x43, 0xA0, 0x47);
pub const WARNING: Color = Color::Rgb(0xFB, 0x8C, 0x00);
pub const INFO: Color = Color::Rgb(0x29, 0xB6, 0xF6);

fn bold(color: Color) -> Style {
    Style::new().fg(color).add_modifier(Modifier::BOLD)
}

fn badge(background: Color) -> Style {
    Style::new()
        .fg(INK)
        .bg(background)
        .add_modifier(Modifier::BOLD)
}

pub fn title() -> Style {
    bold(ACCENT)
}

/// Report section headings and the current question label.
pub fn heading() -> Style {
    bold(PRIMARY_LIGHT)
}

pub fn border_focused() -> Style {
    Style::new().fg(PRIMARY)
}

pub fn muted() -> Style {
    Style::new().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::new().fg(TEXT_DIM)
}

pub fn key_hint() -> Style {
    bold(PRIMARY_LIGHT)
}

/// Hint for a key whose action is unavailable right now.
pub fn key_hint_disabled() -> Style {
    Style::new()
        .fg(TEXT_DIM)
        .add_modifier(Modifier::CROSSED_OUT)
}

pub fn brand_badge() -> Style {
    badge(ACCENT)
}

pub fn mode_badge() -> Style {
    badge(PRIMARY_LIGHT)
}

/// Glyph and style for a toast of the given level.
pub fn notification(level: NotificationLevel) -> (&'static str, Style) {
    match level {
        NotificationLevel::Info => ("ℹ", bold(INFO)),
        NotificationLevel::Success => ("✓", bold(SUCCESS)),
        NotificationLevel::Warning => ("⚠", bold(WARNING)),
        NotificationLevel::Error => ("✗", bold(ERROR)),
    }
}

pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_focused())
        .title(format!(" {title} "))
}
