//! Message formatting and display.
//!
//! Status lines for the one-shot command and the shell, with quiet and
//! verbose modes. Listing and summary lines are built by `render_*`
//! functions so callers can send them to any writer.
//!
//! # Examples
//!
//! ```
//! use pdfstitch::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Reading files...");
//! formatter.success("Merged 2 files");
//! formatter.error("Something went wrong");
//! ```

use crate::config::Config;
use crate::session::{MergeReport, Notice, NoticeKind};
use crate::store::{ItemView, StoreSummary};
use std::io::{self, IsTerminal};

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠ ",
            Self::Error => "✗ ",
            Self::Debug => "→ ",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "\x1b[32m",
            Self::Warning => "\x1b[33m",
            Self::Error => "\x1b[31m",
            Self::Debug => "\x1b[36m",
        }
    }
}

/// Output formatter with configurable verbosity.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Suppress non-error output
    /// * `verbose` - Show verbose output
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Create a formatter from configuration.
    ///
    /// Status lines are silenced in JSON mode; errors still reach stderr.
    pub fn from_config(config: &Config) -> Self {
        let print = config.should_print();
        Self::new(!print, config.verbose && print)
    }

    /// Create a quiet formatter (only warnings and errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Colors only when stdout is a TTY and TERM is set.
    fn should_use_color() -> bool {
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message, even in quiet mode.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message. Always displayed, on stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.format_message(MessageLevel::Error, message));
    }

    /// Print a debug message. Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    /// Print a session notice at its level.
    pub fn notice(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Success => self.success(&notice.message),
            NoticeKind::Error => self.error(&notice.message),
        }
    }

    /// Print a label/value line. Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print the statistics of a successful merge.
    pub fn merge_report(&self, report: &MergeReport) {
        let stats = &report.statistics;
        self.info(&format!(
            "  {} file(s), {} page(s), {}",
            stats.files_merged,
            stats.total_pages,
            report.receipt.format_file_size()
        ));
        self.detail("Input size", &stats.format_input_size());
        self.detail("Read time", &format!("{:.2?}", stats.load_time));
        self.detail("Merge time", &format!("{:.2?}", stats.merge_time));
        self.detail("Write time", &format!("{:.2?}", report.receipt.write_time));
        if stats.decrypted > 0 {
            self.warning(&format!(
                "Ignored encryption on {} input file(s)",
                stats.decrypted
            ));
        }
    }

    fn print_message(&self, level: MessageLevel, message: &str) {
        println!("{}", self.format_message(level, message));
    }

    fn format_message(&self, level: MessageLevel, message: &str) -> String {
        let (prefix, color) = (level.prefix(), level.color());
        if self.colored && !color.is_empty() {
            format!("{color}{prefix}{message}\x1b[0m")
        } else {
            format!("{prefix}{message}")
        }
    }

    /// Check if non-error output should be shown.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

/// One listing row: `  1. report.pdf  (0.2 MB)  [1a2b3c4d]`.
pub fn render_item(view: &ItemView) -> String {
    format!(
        "  {}. {}  ({})  [{}]",
        view.position,
        view.name,
        view.size,
        view.id.short()
    )
}

/// Footer line: `2 file(s), 1.5 MB total`.
pub fn render_summary(summary: &StoreSummary) -> String {
    format!(
        "{} file(s), {:.1} MB total",
        summary.count, summary.total_mb
    )
}
