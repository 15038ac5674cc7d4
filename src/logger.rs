//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` for output that only appears with `--verbose`
//! - `StatusLine` for the single outcome block printed by CLI commands
//!
//! Everything goes to stderr: stdout is reserved for the JSON and SVG
//! documents the CLI emits.
//!
//! # Example
//!
//! ```ignore
//! log!("inspect"; "{} paintable nodes", count);
//! debug!("transform"; "skipping stale path {}", path);
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{IsTerminal, Write, stderr},
    sync::LazyLock,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose or `[log] verbose`)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Bumped whenever something other than the status block reaches the
/// terminal; the status block only redraws over itself.
static FOREIGN_OUTPUT: AtomicUsize = AtomicUsize::new(0);

/// Record output written outside the logger (documents on stdout).
pub fn note_output() {
    FOREIGN_OUTPUT.fetch_add(1, Ordering::SeqCst);
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut out = stderr().lock();
    execute!(out, Clear(ClearType::UntilNewLine)).ok();
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
    note_output();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "transform" | "builder" => prefix.bright_blue().bold().to_string(),
        "preview" | "isolate" => prefix.bright_magenta().bold().to_string(),
        "session" | "group" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Status Line (single block with overwrite)
// ============================================================================

/// Outcome display for CLI commands
///
/// Each message replaces the block printed by the previous one, so a
/// command that reports several stages ends with a single line. Once a log
/// line or a document has been printed below the block, it is left alone.
pub struct StatusLine {
    /// Lines of previous output to clear
    last_lines: usize,
    /// `FOREIGN_OUTPUT` when the block was drawn
    drawn_at: usize,
}

static STATUS: LazyLock<Mutex<StatusLine>> = LazyLock::new(|| Mutex::new(StatusLine::new()));

impl StatusLine {
    pub const fn new() -> Self {
        Self {
            last_lines: 0,
            drawn_at: 0,
        }
    }

    /// Display success message (✓ prefix, green).
    pub fn success(&mut self, message: &str) {
        self.display(format!("{}", "✓".green()), message);
    }

    /// Display error message (✗ prefix, red) with optional detail.
    pub fn error(&mut self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        self.display(format!("{}", "✗".red()), &message);
    }

    /// Display warning message (⚠ prefix, yellow).
    pub fn warning(&mut self, detail: &str) {
        self.display(format!("{}", "⚠".yellow()), detail);
    }

    fn display(&mut self, symbol: String, message: &str) {
        let mut out = stderr().lock();
        let seq = FOREIGN_OUTPUT.load(Ordering::SeqCst);

        let lines = self.lines_to_clear(seq, out.is_terminal());
        if lines > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let lines = lines as u16;
            execute!(out, cursor::MoveUp(lines)).ok();
            execute!(out, Clear(ClearType::FromCursorDown)).ok();
        }

        writeln!(out, "{symbol} {message}").ok();
        out.flush().ok();

        self.last_lines = line_count(message);
        self.drawn_at = seq;
    }

    /// Lines of the previous block that may be erased: none when output is
    /// not a terminal or anything else was printed since it was drawn.
    fn lines_to_clear(&self, seq: usize, is_terminal: bool) -> usize {
        if is_terminal && seq == self.drawn_at {
            self.last_lines
        } else {
            0
        }
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

fn line_count(message: &str) -> usize {
    message.matches('\n').count() + 1
}

/// Global status: success
pub fn status_success(message: &str) {
    STATUS.lock().success(message);
}

/// Global status: error
pub fn status_error(summary: &str, detail: &str) {
    STATUS.lock().error(summary, detail);
}

/// Global status: warning
pub fn status_warning(detail: &str) {
    STATUS.lock().warning(detail);
}
