use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use ratatui_textarea::{CursorMove, TextArea};

use crate::core::questionnaire::{Question, QuestionnaireWizard, TOTAL_QUESTIONS};
use crate::tui::events::{Action, Screen};
use super::super::theme;

const HELPER_TEXT: &str =
    "Please answer one section at a time. Your responses shape the expert analysis.";

/// Outcome of routing a key event through the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorResult {
    /// The editor used the event (text edit or cursor motion).
    Consumed,
    /// The event maps to a navigation action.
    Action(Action),
    /// Not handled here; fall through to global bindings.
    Ignored,
}

/// Answer editor for the current questionnaire step.
pub struct QuestionnaireViewState {
    editor: TextArea<'static>,
    /// Step the editor was last loaded from.
    loaded_step: Option<usize>,
}

impl QuestionnaireViewState {
    pub fn new() -> Self {
        Self {
            editor: TextArea::default(),
            loaded_step: None,
        }
    }

    /// Refill the editor from the wizard's current step.
    pub fn load(&mut self, wizard: &QuestionnaireWizard) {
        let mut editor = TextArea::new(
            wizard
                .current_answer()
                .split('\n')
                .map(str::to_string)
                .collect(),
        );
        editor.move_cursor(CursorMove::Bottom);
        editor.move_cursor(CursorMove::End);
        editor.set_style(theme::border_focused().fg(theme::TEXT));
        editor.set_block(theme::block_focused("Your answer"));
        if let Ok(question) = wizard.current_question() {
            if let Some(placeholder) = question.placeholder {
                editor.set_placeholder_text(placeholder);
            }
        }
        self.editor = editor;
        self.loaded_step = Some(wizard.step_index());
    }

    /// Reload only when the wizard moved to another step.
    pub fn sync(&mut self, wizard: &QuestionnaireWizard) {
        if self.loaded_step != Some(wizard.step_index()) {
            self.load(wizard);
        }
    }

    /// Current editor contents joined with newlines.
    pub fn text(&self) -> String {
        self.editor.lines().join("\n")
    }

    pub fn handle_input(&mut self, event: &Event, wizard: &mut QuestionnaireWizard) -> EditorResult {
        let Event::Key(key) = event else {
            return EditorResult::Ignored;
        };
        if key.kind != KeyEventKind::Press {
            return EditorResult::Ignored;
        }

        if let Some(action) = map_navigation(key) {
            return EditorResult::Action(action);
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return EditorResult::Ignored;
        }

        if self.editor.input(event.clone()) {
            if let Err(e) = wizard.set_current_answer(self.text()) {
                log::warn!("Dropped edit: {e}");
            }
        }
        EditorResult::Consumed
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, wizard: &QuestionnaireWizard) {
        let block = Block::default()
            .title(Span::styled(format!(" {} ", Screen::Questionnaire.label()), theme::title()))
            .borders(Borders::ALL)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(1), // progress
            Constraint::Length(2), // helper
            Constraint::Length(3), // question label
            Constraint::Min(3),    // editor
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let (current, total) = wizard.progress();
        let gauge = Gauge::default()
            .gauge_style(theme::mode_badge())
            .ratio(current as f64 / total as f64)
            .label(format!("{current} / {total}"));
        frame.render_widget(gauge, rows[0]);

        frame.render_widget(
            Paragraph::new(Span::styled(HELPER_TEXT, theme::muted())).wrap(Wrap { trim: true }),
            rows[1],
        );

        if let Ok(question) = wizard.current_question() {
            frame.render_widget(question_label(question), rows[2]);
        }

        frame.render_widget(&self.editor, rows[3]);

        frame.render_widget(Paragraph::new(hint_line(wizard)), rows[4]);
    }
}

impl Default for QuestionnaireViewState {
    fn default() -> Self {
        Self::new()
    }
}

fn map_navigation(key: &KeyEvent) -> Option<Action> {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('n')) | (KeyModifiers::CONTROL, KeyCode::Enter) => {
            Some(Action::Advance)
        }
        (KeyModifiers::CONTROL, KeyCode::Char('p')) | (_, KeyCode::Esc) => Some(Action::Retreat),
        (_, KeyCode::F(1)) => Some(Action::ShowHelp),
        _ => None,
    }
}

fn question_label(question: &Question) -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled(format!("{}. ", question.key.index() + 1), theme::dim()),
        Span::styled(question.label, theme::heading()),
    ]))
    .wrap(Wrap { trim: true })
}

fn hint_line(wizard: &QuestionnaireWizard) -> Line<'static> {
    let style_for = |enabled: bool| {
        if enabled {
            theme::key_hint()
        } else {
            theme::key_hint_disabled()
        }
    };
    let next_label = if wizard.step_index() + 1 == TOTAL_QUESTIONS {
        ":generate "
    } else {
        ":next "
    };

    Line::from(vec![
        Span::styled("Ctrl+N", style_for(wizard.can_advance())),
        Span::raw(next_label),
        Span::styled("Esc", style_for(wizard.can_retreat())),
        Span::raw(":back "),
        Span::styled("F1", theme::key_hint()),
        Span::raw(":help"),
    ])
}
