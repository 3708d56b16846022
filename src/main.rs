use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use miette::IntoDiagnostic;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use msn_eval::config::AppConfig;
use msn_eval::core::export::{MarkdownFileSink, ReportSink};
use msn_eval::core::logging;
use msn_eval::core::questionnaire::{today_utc, AnswerSet, QuestionnaireWizard, Report};
use msn_eval::tui::app::AppState;
use msn_eval::tui::services::Services;

#[derive(Parser, Debug)]
#[command(author, version, about = "Health automation idea evaluator", long_about = None)]
struct Cli {
    /// Render the report from a TOML or JSON answer file instead of running the TUI
    #[arg(long, value_name = "FILE")]
    answers: Option<PathBuf>,

    /// Write the rendered report to this file instead of stdout
    #[arg(long, value_name = "FILE", requires = "answers")]
    output: Option<PathBuf>,

    /// Date embedded in the report (YYYY-MM-DD, default: today in UTC)
    #[arg(long, requires = "answers")]
    date: Option<NaiveDate>,

    /// Config file (default: <config_dir>/msn-eval/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so only headless runs log to the console
    let _log_guard = if cli.answers.is_some() {
        logging::init()
    } else {
        logging::init_tui()
    };
    log::info!("{} v{} starting", msn_eval::NAME, msn_eval::VERSION);

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    match cli.answers.as_deref() {
        Some(answers_path) => render_headless(answers_path, cli.output.as_deref(), cli.date),
        None => run_tui(&config).await,
    }
}

fn render_headless(
    answers_path: &Path,
    output: Option<&Path>,
    date: Option<NaiveDate>,
) -> miette::Result<()> {
    let answers = AnswerSet::from_path(answers_path).into_diagnostic()?;

    let blank = answers.blank_keys();
    if !blank.is_empty() {
        let keys: Vec<&str> = blank.iter().map(|k| k.as_str()).collect();
        tracing::warn!(
            blank = %keys.join(","),
            "Some answers are blank and will render as \"Not specified\""
        );
    }

    let report = Report::generate(&answers, date.unwrap_or_else(today_utc));

    match output {
        Some(path) => {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| miette::miette!("Invalid output path: {}", path.display()))?;
            let dir = path.parent().unwrap_or_else(|| Path::new(""));
            let receipt = MarkdownFileSink::new(dir, file_name)
                .deliver(report.as_str())
                .into_diagnostic()?;
            log::info!("{}", receipt.summary());
        }
        None => println!("{report}"),
    }

    Ok(())
}

async fn run_tui(config: &AppConfig) -> miette::Result<()> {
    // Setup terminal
    enable_raw_mode().into_diagnostic()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).into_diagnostic()?;
    if config.tui.mouse_enabled {
        execute!(stdout, EnableMouseCapture).into_diagnostic()?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).into_diagnostic()?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::from_config(config, event_tx);
    let mut app = AppState::new(event_rx, services, QuestionnaireWizard::new());

    // tokio intervals reject a zero period
    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms.max(1));
    let result = app.run(&mut terminal, tick_rate).await;

    // Restore terminal
    disable_raw_mode().into_diagnostic()?;
    if config.tui.mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture).into_diagnostic()?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen).into_diagnostic()?;
    terminal.show_cursor().into_diagnostic()?;

    log::info!("Shutting down");
    result.into_diagnostic()
}
