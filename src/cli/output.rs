//! CLI output formatting utilities.

use crate::agent::TurnReport;
use console::style;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print the model's answer.
    pub fn reply(msg: &str) {
        println!("{}", msg);
    }

    /// Print the per-turn timing line.
    pub fn stats(report: &TurnReport<'_>) {
        println!("{}", style(report).dim());
    }
}
