use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

/// The committed booking window
pub(crate) const SELECTED_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Cyan);

/// Check-in and check-out dates
pub(crate) const ENDPOINT_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightCyan)
    .add_modifier(Modifier::BOLD);

/// Dates the hover preview would include in the booking
pub(crate) const PREVIEW_STYLE: Style = Style::new().fg(Color::Black).bg(Color::DarkGray);

/// Unavailable dates
pub(crate) const BLOCKED_STYLE: Style = Style::new()
    .fg(Color::DarkGray)
    .bg(Color::Black)
    .add_modifier(Modifier::CROSSED_OUT);

pub(crate) const TODAY_STYLE: Style = BASE_STYLE.fg(Color::LightGreen);

pub(crate) const FOOTER_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) mod jump {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
