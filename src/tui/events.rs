use crate::core::export::ExportReceipt;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for notification TTLs.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A copy/download side effect finished.
    ExportFinished {
        target: ExportTarget,
        result: Result<ExportReceipt, String>,
    },
}

/// High-level actions dispatched by the input mappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Wizard navigation
    Advance,
    Retreat,

    // Report
    Export(ExportTarget),

    // Modals
    ShowHelp,
    CloseHelp,

    // Application
    Quit,
}

/// Where the report is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Clipboard,
    File,
}

impl ExportTarget {
    pub fn label(self) -> &'static str {
        match self {
            ExportTarget::Clipboard => "Copy",
            ExportTarget::File => "Download .md",
        }
    }
}

/// Which screen the main area shows, derived from the wizard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Questionnaire,
    Report,
}

impl Screen {
    pub fn label(self) -> &'static str {
        match self {
            Screen::Questionnaire => "Stage One — User Inquiry",
            Screen::Report => "Generated Expert Evaluation",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Screen::Questionnaire => " EDIT ",
            Screen::Report => " REVIEW ",
        }
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}
