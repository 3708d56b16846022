use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::core::questionnaire::{QuestionnaireWizard, Transition};

use super::events::{Action, AppEvent, ExportTarget, Notification, NotificationLevel, Screen};
use super::layout::{centered_rect, AppLayout};
use super::services::Services;
use super::theme;
use super::views::questionnaire::{EditorResult, QuestionnaireViewState};
use super::views::report::ReportViewState;

const APP_TITLE: &str = "M.S.N — Health Automation Evaluator";
const TAGLINE: &str = "Master-level prompt optimization specialist and senior medical doctor";
const DISCLAIMER: &str =
    "Educational use only. Not a substitute for professional medical diagnosis or treatment.";

/// Ticks a notification stays on screen.
const NOTIFICATION_TTL_TICKS: u32 = 100;
const MAX_NOTIFICATIONS: usize = 3;

/// Everything the evaluator UI needs between frames.
pub struct AppState {
    /// Cleared on quit.
    pub running: bool,
    /// Questionnaire state machine; the single source of truth for answers.
    pub wizard: QuestionnaireWizard,
    /// Answer editor for the current step.
    pub questionnaire: QuestionnaireViewState,
    /// Scroll state of the report view.
    pub report_view: ReportViewState,
    /// Toasts, newest last.
    pub notifications: Vec<Notification>,
    /// Help overlay visible.
    pub show_help: bool,
    /// Receiver for side-effect results.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Injected copy/download capabilities.
    services: Services,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        services: Services,
        wizard: QuestionnaireWizard,
    ) -> Self {
        let mut questionnaire = QuestionnaireViewState::new();
        questionnaire.load(&wizard);
        Self {
            running: true,
            wizard,
            questionnaire,
            report_view: ReportViewState::new(),
            notifications: Vec::new(),
            show_help: false,
            event_rx,
            services,
        }
    }

    /// Screen shown in the main area.
    pub fn screen(&self) -> Screen {
        if self.wizard.is_complete() {
            Screen::Report
        } else {
            Screen::Questionnaire
        }
    }

    /// Draw, wait for the next tick, channel message or key, then update.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => self.handle_input(&crossterm_event),
            AppEvent::Tick => self.on_tick(),
            AppEvent::ExportFinished { target, result } => match result {
                Ok(receipt) => self.push_notification(receipt.summary(), NotificationLevel::Success),
                Err(e) => self.push_notification(
                    format!("{} failed: {e}", target.label()),
                    NotificationLevel::Error,
                ),
            },
        }
    }

    fn handle_input(&mut self, event: &Event) {
        // Priority 1: Help modal
        if self.show_help {
            if let Some(action) = map_help_input(event) {
                self.handle_action(action);
            }
            return;
        }

        // Priority 2: Current screen
        match self.screen() {
            Screen::Questionnaire => {
                match self.questionnaire.handle_input(event, &mut self.wizard) {
                    EditorResult::Consumed => return,
                    EditorResult::Action(action) => {
                        self.handle_action(action);
                        return;
                    }
                    EditorResult::Ignored => {}
                }
            }
            Screen::Report => {
                if let Ok(report) = self.wizard.report() {
                    if let Some(action) = self.report_view.handle_input(event, report) {
                        self.handle_action(action);
                        return;
                    }
                }
            }
        }

        // Priority 3: Global keybindings
        if let Some(action) = self.map_input_to_action(event) {
            self.handle_action(action);
        }
    }

    fn map_input_to_action(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (_, KeyCode::F(1)) => Some(Action::ShowHelp),
            // Plain letters are answer text while editing
            (KeyModifiers::NONE | KeyModifiers::SHIFT, _) if self.screen() == Screen::Report => {
                match code {
                    KeyCode::Char('q') => Some(Action::Quit),
                    KeyCode::Char('?') => Some(Action::ShowHelp),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::Advance => {
                let transition = self.wizard.advance();
                self.apply_transition(transition);
            }
            Action::Retreat => {
                let transition = self.wizard.retreat();
                self.apply_transition(transition);
            }
            Action::Export(target) => self.export(target),
        }
    }

    /// Bring the views in line with the wizard after a navigation request.
    fn apply_transition(&mut self, transition: Transition) {
        if !transition.changed_state() {
            return;
        }
        match transition {
            Transition::Completed => {
                self.report_view.reset();
                log::info!("Showing generated report");
            }
            Transition::Reopened => self.questionnaire.load(&self.wizard),
            _ => self.questionnaire.sync(&self.wizard),
        }
    }

    fn export(&mut self, target: ExportTarget) {
        match self.wizard.report() {
            Ok(report) => self.services.export(target, report.as_str().to_string()),
            Err(e) => self.push_notification(e.to_string(), NotificationLevel::Warning),
        }
    }

    /// Show a toast unless the same message is already visible. Oldest drops past the cap.
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }
        self.notifications.push(Notification {
            message,
            level,
            ttl_ticks: NOTIFICATION_TTL_TICKS,
        });
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let layout = AppLayout::compute(area);

        if let Some(header) = layout.header {
            render_header(frame, header);
        }

        match self.wizard.report() {
            Ok(report) => self.report_view.render(frame, layout.main, report),
            Err(_) => self.questionnaire.render(frame, layout.main, &self.wizard),
        }

        if let Some(footer) = layout.footer {
            frame.render_widget(
                Paragraph::new(Span::styled(DISCLAIMER, theme::dim())).alignment(Alignment::Center),
                footer,
            );
        }

        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, area);
        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let screen = self.screen();
        let detail = match self.wizard.report() {
            Ok(report) => format!("Generated on {}", report.generated_on().format("%Y-%m-%d")),
            Err(_) => {
                let (current, total) = self.wizard.progress();
                format!("Question {current} / {total}")
            }
        };

        let status = Line::from(vec![
            Span::styled(" M.S.N ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled(screen.badge(), theme::mode_badge()),
            Span::raw(" "),
            Span::styled(detail, Style::default().fg(theme::PRIMARY_LIGHT).bold()),
            Span::raw(" │ "),
            Span::styled("F1", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("Ctrl+C", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 60.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let notification_area = Rect::new(x, 1, max_width, height).intersection(area);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, style) = theme::notification(n.level);
                Line::from(vec![
                    Span::styled(format!(" {prefix} "), style),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 70, area);

        let keybindings = [
            ("Global:", ""),
            ("F1", "Toggle this help"),
            ("Ctrl+C", "Quit"),
            ("", ""),
            ("Answering:", ""),
            ("Ctrl+N / Ctrl+Enter", "Next question (generate on the last)"),
            ("Esc / Ctrl+P", "Previous question"),
            ("Enter", "New line in the answer"),
            ("", ""),
            ("Report:", ""),
            ("j/k, PgUp/PgDn", "Scroll"),
            ("g / G", "Jump to top / bottom"),
            ("c", "Copy report to clipboard"),
            ("d", "Download report as .md"),
            ("e / Esc", "Edit answers"),
            ("?", "Toggle this help"),
            ("q", "Quit"),
        ];

        let mut lines = vec![Line::raw("")];
        for (key, desc) in keybindings {
            if desc.is_empty() && !key.is_empty() {
                lines.push(Line::from(Span::styled(key, theme::title())));
            } else if key.is_empty() {
                lines.push(Line::raw(""));
            } else {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {key:<22}"), theme::key_hint()),
                    Span::raw(desc),
                ]));
            }
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("Press "),
            Span::styled("Esc", theme::key_hint()),
            Span::raw(" to close"),
        ]));

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            modal,
        );
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(APP_TITLE, theme::title())),
        Line::from(Span::styled(TAGLINE, theme::muted())),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::dim());
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

/// Keys accepted while the help overlay is open.
fn map_help_input(event: &Event) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };

    match (*modifiers, *code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
        (_, KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1)) => Some(Action::CloseHelp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    use crate::core::export::{ExportError, ExportReceipt, Exporters, ReportSink};
    use crate::core::questionnaire::{QuestionKey, LAST_STEP};

    /// Sink that records what it was given.
    struct RecordingSink {
        delivered: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl ReportSink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn deliver(&self, report: &str) -> Result<ExportReceipt, ExportError> {
            if self.fail {
                return Err(ExportError::NoClipboard("none".to_string()));
            }
            self.delivered.lock().unwrap().push(report.to_string());
            Ok(ExportReceipt::Copied {
                command: "record".to_string(),
            })
        }
    }

    fn fixed_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
    }

    fn app_with(clipboard_fails: bool) -> (AppState, Arc<Mutex<Vec<String>>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let exporters = Exporters::new(
            Box::new(RecordingSink {
                delivered: Arc::clone(&delivered),
                fail: clipboard_fails,
            }),
            Box::new(RecordingSink {
                delivered: Arc::clone(&delivered),
                fail: false,
            }),
        );
        let services = Services::new(exporters, tx);
        let app = AppState::new(rx, services, QuestionnaireWizard::with_date_source(fixed_date));
        (app, delivered)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Input(Event::Key(KeyEvent::new(code, modifiers)))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            app.handle_event(key(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn next(app: &mut AppState) {
        app.handle_event(key(KeyCode::Char('n'), KeyModifiers::CONTROL));
    }

    fn complete(app: &mut AppState) {
        for key in QuestionKey::ALL {
            type_text(app, &format!("answer {key}"));
            next(app);
        }
    }

    fn screen_text(app: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_blank_answer_blocks_without_notification() {
        let (mut app, _) = app_with(false);
        type_text(&mut app, "   ");
        next(&mut app);
        assert_eq!(app.wizard.step_index(), 0);
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_keyboard_flow_reaches_report() {
        let (mut app, _) = app_with(false);
        complete(&mut app);

        assert_eq!(app.screen(), Screen::Report);
        let report = app.wizard.report().unwrap();
        assert!(report.as_str().contains("- Idea: answer idea"));
        assert_eq!(report.generated_on(), fixed_date());
    }

    #[test]
    fn test_edit_from_report_returns_to_last_question() {
        let (mut app, _) = app_with(false);
        complete(&mut app);

        app.handle_event(key(KeyCode::Char('e'), KeyModifiers::NONE));
        assert_eq!(app.screen(), Screen::Questionnaire);
        assert_eq!(app.wizard.step_index(), LAST_STEP);
        assert_eq!(app.questionnaire.text(), "answer q18");
    }

    #[test]
    fn test_q_is_text_while_editing_and_quits_while_reviewing() {
        let (mut app, _) = app_with(false);
        type_text(&mut app, "q");
        assert!(app.running);
        assert_eq!(app.wizard.current_answer(), "q");

        let (mut app, _) = app_with(false);
        complete(&mut app);
        app.handle_event(key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!app.running);
    }

    #[test]
    fn test_ctrl_c_quits_from_editor() {
        let (mut app, _) = app_with(false);
        app.handle_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_help_modal_toggle() {
        let (mut app, _) = app_with(false);
        app.handle_event(key(KeyCode::F(1), KeyModifiers::NONE));
        assert!(app.show_help);

        // Typing is swallowed while the modal is open
        type_text(&mut app, "x");
        assert_eq!(app.wizard.current_answer(), "");

        app.handle_event(key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn test_download_delivers_report_and_notifies() {
        let (mut app, delivered) = app_with(false);
        complete(&mut app);

        app.handle_event(key(KeyCode::Char('d'), KeyModifiers::NONE));
        let event = app.event_rx.recv().await.unwrap();
        app.handle_event(event);

        let expected = app.wizard.report().unwrap().as_str().to_string();
        assert_eq!(delivered.lock().unwrap().as_slice(), &[expected]);
        assert_eq!(app.notifications.len(), 1);
        assert_eq!(app.notifications[0].level, NotificationLevel::Success);
        assert_eq!(app.notifications[0].message, "Copied to clipboard via record");
    }

    #[tokio::test]
    async fn test_failed_copy_surfaces_error_notification() {
        let (mut app, delivered) = app_with(true);
        complete(&mut app);

        app.handle_event(key(KeyCode::Char('c'), KeyModifiers::NONE));
        let event = app.event_rx.recv().await.unwrap();
        app.handle_event(event);

        assert!(delivered.lock().unwrap().is_empty());
        assert_eq!(app.notifications[0].level, NotificationLevel::Error);
        assert!(app.notifications[0].message.starts_with("Copy failed"));
    }

    #[test]
    fn test_notifications_dedup_cap_and_expire() {
        let (mut app, _) = app_with(false);
        app.push_notification("one".into(), NotificationLevel::Info);
        app.push_notification("one".into(), NotificationLevel::Info);
        assert_eq!(app.notifications.len(), 1);

        for msg in ["two", "three", "four"] {
            app.push_notification(msg.into(), NotificationLevel::Info);
        }
        assert_eq!(app.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(app.notifications[0].message, "two");

        for _ in 0..NOTIFICATION_TTL_TICKS {
            app.handle_event(AppEvent::Tick);
        }
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_render_editing_screen() {
        let (mut app, _) = app_with(false);
        let text = screen_text(&mut app);
        assert!(text.contains("Health Automation Evaluator"));
        assert!(text.contains("1 / 9"));
        assert!(text.contains("Educational use only."));
    }

    #[test]
    fn test_render_report_screen() {
        let (mut app, _) = app_with(false);
        complete(&mut app);
        let text = screen_text(&mut app);
        assert!(text.contains("Generated Expert Evaluation"));
        assert!(text.contains("A. Summary"));
        assert!(text.contains("Generated on 2025-01-31"));
    }
}
