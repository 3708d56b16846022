use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::questionnaire::{Report, ReportSection};
use crate::tui::events::{Action, ExportTarget, Screen};
use super::super::theme;

const HELPER_TEXT: &str = "Stages Two–Eight produced from your Stage One answers.";

/// Lines moved per PageUp/PageDown.
const PAGE_LINES: u16 = 10;

/// Scroll state for the generated report.
///
/// `scroll` counts wrapped rows, not report lines. The largest useful offset
/// depends on the terminal width, so it is measured on every render.
#[derive(Debug, Default)]
pub struct ReportViewState {
    scroll: u16,
    /// Last offset that still fills the viewport, from the latest render.
    max_scroll: Option<u16>,
}

impl ReportViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the top; called when a fresh report is generated.
    pub fn reset(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Handle input. Returns an action for keys that leave the view.
    pub fn handle_input(&mut self, event: &Event, report: &Report) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        if modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        // Before the first frame only the unwrapped line count is known
        let max_scroll = self.max_scroll.unwrap_or_else(|| {
            u16::try_from(report.line_count().saturating_sub(1)).unwrap_or(u16::MAX)
        });
        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1).min(max_scroll);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(PAGE_LINES).min(max_scroll);
                None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(PAGE_LINES);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.scroll = 0;
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.scroll = max_scroll;
                None
            }
            KeyCode::Char('e') | KeyCode::Esc => Some(Action::Retreat),
            KeyCode::Char('c') => Some(Action::Export(ExportTarget::Clipboard)),
            KeyCode::Char('d') => Some(Action::Export(ExportTarget::File)),
            _ => None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, report: &Report) {
        let block = Block::default()
            .title(Span::styled(format!(" {} ", Screen::Report.label()), theme::title()))
            .borders(Borders::ALL)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(HELPER_TEXT, theme::muted())),
            rows[0],
        );

        let divider = Block::default().borders(Borders::TOP).border_style(theme::dim());
        let viewport = divider.inner(rows[1]);
        frame.render_widget(divider, rows[1]);

        let body = Paragraph::new(styled_lines(report)).wrap(Wrap { trim: false });
        let rows_needed = body.line_count(viewport.width);
        let max_scroll = u16::try_from(rows_needed.saturating_sub(usize::from(viewport.height)))
            .unwrap_or(u16::MAX);
        self.max_scroll = Some(max_scroll);
        self.scroll = self.scroll.min(max_scroll);
        frame.render_widget(body.scroll((self.scroll, 0)), viewport);

        let hints = Line::from(vec![
            Span::styled("c", theme::key_hint()),
            Span::raw(format!(":{} ", ExportTarget::Clipboard.label())),
            Span::styled("d", theme::key_hint()),
            Span::raw(format!(":{} ", ExportTarget::File.label())),
            Span::styled("e", theme::key_hint()),
            Span::raw(":edit answers "),
            Span::styled("j/k", theme::key_hint()),
            Span::raw(":scroll"),
        ]);
        frame.render_widget(Paragraph::new(hints), rows[2]);
    }
}

fn is_heading(line: &str) -> bool {
    ReportSection::ALL
        .iter()
        .any(|section| line.starts_with(section.heading()))
}

fn styled_lines(report: &Report) -> Vec<Line<'_>> {
    report
        .as_str()
        .lines()
        .map(|line| {
            if is_heading(line) {
                Line::from(Span::styled(line, theme::heading()))
            } else {
                Line::raw(line)
            }
        })
        .collect()
}
