//! Report export sinks.
//!
//! The questionnaire core never performs I/O. The front end is handed a set
//! of [`ReportSink`]s and pushes the frozen report text into them when the
//! user asks to copy or download it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::ExportConfig;

/// Default file name for downloaded reports.
pub const DEFAULT_FILE_NAME: &str = "health-automation-evaluation.md";

/// Clipboard commands tried in order when none is configured.
const CLIPBOARD_CANDIDATES: &[&[&str]] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
    &["pbcopy"],
    &["clip.exe"],
];

/// Errors raised while exporting a report.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No clipboard command available (tried: {0})")]
    NoClipboard(String),

    #[error("Clipboard command '{command}' failed: {reason}")]
    Command { command: String, reason: String },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// What a sink did with the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportReceipt {
    Copied { command: String },
    Written { path: PathBuf, bytes: usize },
}

impl ExportReceipt {
    /// Short human-readable summary for notifications.
    pub fn summary(&self) -> String {
        match self {
            ExportReceipt::Copied { command } => format!("Copied to clipboard via {command}"),
            ExportReceipt::Written { path, bytes } => {
                format!("Saved {} ({bytes} bytes)", path.display())
            }
        }
    }
}

/// A destination for the finished report text.
pub trait ReportSink: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn deliver(&self, report: &str) -> Result<ExportReceipt, ExportError>;
}

// ============================================================================
// Clipboard
// ============================================================================

/// Copies the report by piping it into a system clipboard command.
#[derive(Debug, Clone, Default)]
pub struct ClipboardSink {
    /// Explicit command (program + args). When `None`, the first working
    /// candidate is used.
    command: Option<Vec<String>>,
}

impl ClipboardSink {
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self {
            command: command.filter(|c| !c.is_empty()),
        }
    }

    fn run(argv: &[String], text: &str) -> Result<(), ExportError> {
        let display = argv.join(" ");
        let (program, args) = argv.split_first().ok_or_else(|| ExportError::Command {
            command: display.clone(),
            reason: "empty command".to_string(),
        })?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ExportError::Command {
                command: display.clone(),
                reason: e.to_string(),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| ExportError::Command {
                    command: display.clone(),
                    reason: e.to_string(),
                })?;
        }

        let status = child.wait().map_err(|e| ExportError::Command {
            command: display.clone(),
            reason: e.to_string(),
        })?;
        if !status.success() {
            return Err(ExportError::Command {
                command: display,
                reason: format!("exited with {status}"),
            });
        }
        Ok(())
    }
}

impl ReportSink for ClipboardSink {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    fn deliver(&self, report: &str) -> Result<ExportReceipt, ExportError> {
        if let Some(ref argv) = self.command {
            Self::run(argv, report)?;
            return Ok(ExportReceipt::Copied {
                command: argv.join(" "),
            });
        }

        let mut tried = Vec::new();
        for candidate in CLIPBOARD_CANDIDATES {
            let argv: Vec<String> = candidate.iter().map(|s| s.to_string()).collect();
            match Self::run(&argv, report) {
                Ok(()) => {
                    return Ok(ExportReceipt::Copied {
                        command: argv.join(" "),
                    })
                }
                Err(e) => {
                    log::debug!("Clipboard candidate unavailable: {e}");
                    tried.push(candidate[0]);
                }
            }
        }
        Err(ExportError::NoClipboard(tried.join(", ")))
    }
}

// ============================================================================
// Markdown file
// ============================================================================

/// Writes the report as a markdown file.
#[derive(Debug, Clone)]
pub struct MarkdownFileSink {
    dir: PathBuf,
    file_name: String,
}

impl MarkdownFileSink {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn target_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn write(path: &Path, report: &str) -> Result<(), ExportError> {
        let io_err = |source| ExportError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, report).map_err(io_err)
    }
}

impl ReportSink for MarkdownFileSink {
    fn name(&self) -> &'static str {
        "markdown-file"
    }

    fn deliver(&self, report: &str) -> Result<ExportReceipt, ExportError> {
        let path = self.target_path();
        Self::write(&path, report)?;
        Ok(ExportReceipt::Written {
            path,
            bytes: report.len(),
        })
    }
}

// ============================================================================
// Injected capabilities
// ============================================================================

/// Sinks handed to the front end: one for "copy", one for "download".
pub struct Exporters {
    pub clipboard: Box<dyn ReportSink>,
    pub file: Box<dyn ReportSink>,
}

impl Exporters {
    pub fn new(clipboard: Box<dyn ReportSink>, file: Box<dyn ReportSink>) -> Self {
        Self { clipboard, file }
    }

    /// System clipboard plus a markdown file in the configured directory.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(
            Box::new(ClipboardSink::new(config.clipboard_command.clone())),
            Box::new(MarkdownFileSink::new(
                config.resolved_dir(),
                config.file_name.clone(),
            )),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MarkdownFileSink::new(dir.path().join("nested"), DEFAULT_FILE_NAME);

        let receipt = sink.deliver("A. Summary\n- Idea: x").unwrap();
        let expected = dir.path().join("nested").join(DEFAULT_FILE_NAME);
        assert_eq!(
            receipt,
            ExportReceipt::Written {
                path: expected.clone(),
                bytes: 20,
            }
        );
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "A. Summary\n- Idea: x");
    }

    #[test]
    fn test_markdown_sink_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sink = MarkdownFileSink::new(dir.path(), "report.md");
        sink.deliver("first").unwrap();
        sink.deliver("second").unwrap();
        assert_eq!(std::fs::read_to_string(sink.target_path()).unwrap(), "second");
    }

    #[test]
    fn test_clipboard_sink_ignores_empty_command() {
        let sink = ClipboardSink::new(Some(Vec::new()));
        assert!(sink.command.is_none());
    }

    #[test]
    fn test_clipboard_sink_reports_missing_program() {
        let sink = ClipboardSink::new(Some(vec!["definitely-not-a-clipboard-tool".to_string()]));
        let err = sink.deliver("text").unwrap_err();
        assert!(matches!(err, ExportError::Command { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_clipboard_sink_pipes_into_command() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clip.txt");
        let sink = ClipboardSink::new(Some(vec![
            "sh".to_string(),
            "-c".to_string(),
            format!("cat > {}", out.display()),
        ]));

        let receipt = sink.deliver("copied report").unwrap();
        assert!(matches!(receipt, ExportReceipt::Copied { .. }));
        assert_eq!(std::fs::read_to_string(out).unwrap(), "copied report");
    }

    #[test]
    fn test_receipt_summary() {
        let receipt = ExportReceipt::Written {
            path: PathBuf::from("/tmp/r.md"),
            bytes: 2048,
        };
        assert_eq!(receipt.summary(), "Saved /tmp/r.md (2048 bytes)");
        assert_eq!(
            ExportReceipt::Copied { command: "xclip -selection clipboard".into() }.summary(),
            "Copied to clipboard via xclip -selection clipboard"
        );
    }
}
