//! Root layout: header + main content + disclaimer footer + status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Rows used by the header (title + tagline inside a border).
pub const HEADER_HEIGHT: u16 = 4;
/// Rows used by the disclaimer footer.
pub const FOOTER_HEIGHT: u16 = 1;
/// Below this height the header collapses to keep room for the form.
pub const COMPACT_HEIGHT_THRESHOLD: u16 = 16;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Header area (None when the terminal is too short).
    pub header: Option<Rect>,
    /// Main content area.
    pub main: Rect,
    /// Disclaimer footer (None when the terminal is too short).
    pub footer: Option<Rect>,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect) -> Self {
        if area.height < COMPACT_HEIGHT_THRESHOLD {
            let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
            return AppLayout {
                header: None,
                main: rows[0],
                footer: None,
                status: rows[1],
            };
        }

        let rows = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(FOOTER_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

        AppLayout {
            header: Some(rows[0]),
            main: rows[1],
            footer: Some(rows[2]),
            status: rows[3],
        }
    }
}

/// Calculate a centered rect using percentage of parent area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = AppLayout::compute(area);
        assert_eq!(layout.header.unwrap().height, HEADER_HEIGHT);
        assert_eq!(layout.footer.unwrap().height, FOOTER_HEIGHT);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.main.height, 40 - HEADER_HEIGHT - FOOTER_HEIGHT - 1);
    }

    #[test]
    fn test_compact_layout_drops_chrome() {
        let area = Rect::new(0, 0, 80, 10);
        let layout = AppLayout::compute(area);
        assert!(layout.header.is_none());
        assert!(layout.footer.is_none());
        assert_eq!(layout.main.height, 9);
        assert_eq!(layout.status.y, 9);
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.x + centered.width <= area.width);
        assert!(centered.y + centered.height <= area.height);
    }
}
