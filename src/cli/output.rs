//! Human-facing output for pathgate
//!
//! Stdout is reserved for machine-readable results (`::set-output` commands,
//! changed paths), so every message here goes to stderr. Errors are additionally
//! reported as an `::error::` workflow command when running in GitHub Actions.

use console::style;

use crate::output::escape_data;

/// Output handler for consistent CLI formatting
pub struct Output {
    quiet: bool,
    actions: bool,
}

impl Output {
    pub fn new(quiet: bool, actions: bool) -> Self {
        Self { quiet, actions }
    }

    /// Print an error message. Shown even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.actions {
            println!("::error::{}", escape_data(message));
        }
        eprintln!("{} {}", style("✖").red().for_stderr(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("⚠").yellow().for_stderr(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("ℹ").blue().for_stderr(), message);
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✔").green().for_stderr(), message);
        }
    }

    /// Print a header/title
    pub fn header(&self, title: &str) {
        if !self.quiet {
            eprintln!("\n{}", style(title).bold().underlined().for_stderr());
        }
    }

    /// Print a key-value pair with consistent styling
    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if !self.quiet {
            let styled_value = if highlight {
                style(value).green().bold().for_stderr()
            } else {
                style(value).for_stderr()
            };
            eprintln!("  {:<12} {}", style(key).dim().for_stderr(), styled_value);
        }
    }

    /// One line per filter: matched or not, with its file count
    pub fn status_indicator(&self, status: &str, message: &str, is_success: bool) {
        if !self.quiet {
            let (icon, status) = if is_success {
                ("✓", style(status).green().for_stderr())
            } else {
                ("✗", style(status).dim().for_stderr())
            };
            eprintln!("{} {} {}", style(icon).bold().for_stderr(), status.bold(), message);
        }
    }

    /// A matched file listed under its filter
    pub fn match_line(&self, path: &str) {
        if !self.quiet {
            eprintln!("    {} {}", style("•").cyan().for_stderr(), path);
        }
    }
}
