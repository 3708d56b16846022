/// M.S.N Health Automation Evaluator (TUI Edition)
///
/// Core library providing the Stage One questionnaire wizard, the expert
/// evaluation report generator, and report export sinks.

pub mod config;
pub mod core;
pub mod tui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
