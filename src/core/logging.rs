//! Logging and diagnostics setup.
//!
//! - JSON log file with daily rotation (tracing-appender)
//! - Optional pretty console layer on stderr for headless runs
//! - `log` facade events forwarded into tracing
//! - miette handler tuned to the detected terminal

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use supports_color::Stream;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Base name of the rolling log file.
const LOG_FILE_NAME: &str = "msn-eval.log";

// ============================================================================
// Diagnostic rendering
// ============================================================================

/// Color depth reported for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLevel {
    TrueColor,
    Ansi256,
    Ansi16,
    NoColor,
}

/// How miette should render diagnostics on this terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticStyle {
    pub color: ColorLevel,
    pub unicode: bool,
    pub interactive: bool,
}

impl DiagnosticStyle {
    /// Inspect stderr and the locale. Diagnostics are printed to stderr, so
    /// that is the stream that matters.
    pub fn detect() -> Self {
        use is_terminal::IsTerminal;

        let color = supports_color::on(Stream::Stderr).map_or(ColorLevel::NoColor, |level| {
            if level.has_16m {
                ColorLevel::TrueColor
            } else if level.has_256 {
                ColorLevel::Ansi256
            } else if level.has_basic {
                ColorLevel::Ansi16
            } else {
                ColorLevel::NoColor
            }
        });

        Self {
            color,
            unicode: locale_supports_unicode(
                std::env::var("TERM").ok().as_deref(),
                std::env::var("LANG").ok().as_deref(),
            ),
            interactive: io::stderr().is_terminal(),
        }
    }

    pub fn colorize(&self) -> bool {
        self.interactive && self.color != ColorLevel::NoColor
    }

    /// OSC 8 links are only emitted on capable interactive terminals.
    pub fn hyperlinks(&self) -> bool {
        self.interactive && self.color == ColorLevel::TrueColor
    }
}

/// Unset variables count as capable; a `dumb` terminal or a non-UTF-8
/// `LANG` does not.
fn locale_supports_unicode(term: Option<&str>, lang: Option<&str>) -> bool {
    let term_ok = term.map_or(true, |t| !t.contains("dumb"));
    let lang_ok = lang.map_or(true, |l| {
        let l = l.to_ascii_lowercase();
        l.contains("utf-8") || l.contains("utf8")
    });
    term_ok && lang_ok
}

// ============================================================================
// Logging Initialization
// ============================================================================

/// Directory holding the log files (`<data_dir>/msn-eval/logs`).
pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("msn-eval").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn prepare_log_dir() -> PathBuf {
    let dir = log_dir();
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("Failed to create log directory {}: {e}", dir.display());
    }
    dir
}

/// JSON file layer writing through a non-blocking daily appender.
fn file_layer<S>(dir: &Path) -> (impl Layer<S>, WorkerGuard)
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter());
    (layer, guard)
}

/// Initialize logging for headless runs.
///
/// Writes JSON to the log file and a pretty rendering to stderr, keeping
/// stdout free for the report.
///
/// The returned guard must be held until exit so buffered lines are flushed.
pub fn init() -> WorkerGuard {
    let dir = prepare_log_dir();
    let (file, guard) = file_layer(&dir);
    let console = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .pretty()
        .with_filter(env_filter());

    if let Err(e) = tracing_subscriber::registry()
        .with(file)
        .with(console)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {e}");
    }

    finish_init(dir);
    guard
}

/// Initialize logging for TUI mode: file only, since ratatui owns the
/// terminal while in raw/alternate-screen mode.
pub fn init_tui() -> WorkerGuard {
    let dir = prepare_log_dir();
    let (file, guard) = file_layer(&dir);

    if let Err(e) = tracing_subscriber::registry().with(file).try_init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    finish_init(dir);
    guard
}

fn finish_init(dir: PathBuf) {
    install_miette_hook(DiagnosticStyle::detect());

    log::info!(
        "Logging to {} (daily rolling)",
        dir.join(LOG_FILE_NAME).display()
    );

    std::thread::spawn(move || compress_old_logs(&dir));
}

fn install_miette_hook(style: DiagnosticStyle) {
    let installed = miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(style.hyperlinks())
                .unicode(style.unicode)
                .color(style.colorize())
                .context_lines(2)
                .break_words(true)
                .build(),
        )
    }));
    if installed.is_err() {
        log::debug!("miette hook already installed");
    }
}

// ============================================================================
// Old log compression
// ============================================================================

/// Whether a file in the log directory should be gzipped.
///
/// Rolled files are named `msn-eval.log.YYYY-MM-DD`; today's file and files
/// already compressed are left alone.
fn should_compress(name: &str, today_suffix: &str) -> bool {
    name.strip_prefix(LOG_FILE_NAME)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|date| date != today_suffix && !date.ends_with(".gz"))
}

fn compress_old_logs(dir: &Path) {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let stale = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| should_compress(name, &today))
        });

    for path in stale {
        match compress_file(&path) {
            Ok(Some(gz)) => log::info!("Compressed old log to {}", gz.display()),
            Ok(None) => {}
            Err(e) => log::warn!("Failed to compress {}: {e}", path.display()),
        }
    }
}

/// Gzip `path` to `<path>.gz` and remove the original. Returns `None` when
/// the archive already exists.
fn compress_file(path: &Path) -> io::Result<Option<PathBuf>> {
    let mut gz_name = OsString::from(path.as_os_str());
    gz_name.push(".gz");
    let gz_path = PathBuf::from(gz_name);
    if gz_path.exists() {
        return Ok(None);
    }

    let mut source = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut source, &mut encoder)?;
    encoder.finish()?;
    fs::remove_file(path)?;

    Ok(Some(gz_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_should_compress_rolled_files_only() {
        let today = "2025-02-01";
        assert!(should_compress("msn-eval.log.2025-01-31", today));
        assert!(!should_compress("msn-eval.log.2025-02-01", today));
        assert!(!should_compress("msn-eval.log.2025-01-31.gz", today));
        assert!(!should_compress("msn-eval.log", today));
        assert!(!should_compress("other.log.2025-01-31", today));
    }

    #[test]
    fn test_compress_file_replaces_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msn-eval.log.2025-01-31");
        fs::write(&path, "{\"msg\":\"hello\"}\n").unwrap();

        let gz_path = compress_file(&path).unwrap().unwrap();

        assert!(!path.exists());
        assert_eq!(gz_path, dir.path().join("msn-eval.log.2025-01-31.gz"));
        let mut decoder = flate2::read::GzDecoder::new(fs::File::open(gz_path).unwrap());
        let mut contents = String::new();
        decoder.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "{\"msg\":\"hello\"}\n");
    }

    #[test]
    fn test_compress_file_keeps_existing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msn-eval.log.2025-01-30");
        fs::write(&path, "new").unwrap();
        fs::write(dir.path().join("msn-eval.log.2025-01-30.gz"), "old").unwrap();

        assert_eq!(compress_file(&path).unwrap(), None);
        assert!(path.exists());
    }

    #[test]
    fn test_compress_old_logs_skips_today() {
        let dir = tempfile::tempdir().unwrap();
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let current = dir.path().join(format!("msn-eval.log.{today}"));
        let old = dir.path().join("msn-eval.log.2000-01-01");
        fs::write(&current, "now").unwrap();
        fs::write(&old, "then").unwrap();

        compress_old_logs(dir.path());

        assert!(current.exists());
        assert!(!old.exists());
        assert!(dir.path().join("msn-eval.log.2000-01-01.gz").exists());
    }

    #[test]
    fn test_log_dir_is_app_scoped() {
        let dir = log_dir();
        assert!(dir.ends_with("msn-eval/logs") || dir == PathBuf::from("logs"));
    }

    #[test]
    fn test_locale_unicode_detection() {
        assert!(locale_supports_unicode(None, None));
        assert!(locale_supports_unicode(Some("xterm-256color"), Some("en_US.UTF-8")));
        assert!(locale_supports_unicode(Some("xterm"), Some("de_DE.utf8")));
        assert!(!locale_supports_unicode(Some("dumb"), Some("en_US.UTF-8")));
        assert!(!locale_supports_unicode(Some("xterm"), Some("C")));
    }

    #[test]
    fn test_piped_stderr_disables_color_and_links() {
        let style = DiagnosticStyle {
            color: ColorLevel::TrueColor,
            unicode: true,
            interactive: false,
        };
        assert!(!style.colorize());
        assert!(!style.hyperlinks());

        let tty = DiagnosticStyle { interactive: true, ..style };
        assert!(tty.colorize());
        assert!(tty.hyperlinks());
    }
}
