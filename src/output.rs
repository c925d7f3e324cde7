//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status lines,
//! a spinner while the filesystem is being worked on, and the closing summary
//! table. Every action of a sweep is printed through here, one line each.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mediasweep::output::OutputFormatter;
    /// OutputFormatter::success("Deleted file: /data/inbox/draft.txt");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark, on stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a ticking spinner with a message, for work of unknown length.
    pub fn create_spinner(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Prints a summary table of action counts.
    ///
    /// Rows are printed in the order given.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mediasweep::output::OutputFormatter;
    ///
    /// OutputFormatter::summary_table(&[("Pruned", 3), ("Moved", 12), ("Failed", 0)]);
    /// ```
    pub fn summary_table(rows: &[(&str, usize)]) {
        Self::header("SUMMARY");

        let max_label_len = rows
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0)
            .max(6); // At least "Action" width

        println!(
            "{:<width$} | {}",
            "Action".bold(),
            "Entries".bold(),
            width = max_label_len
        );
        println!("{}", "-".repeat(max_label_len + 12));

        for (label, count) in rows {
            let count_text = if *label == "Failed" && *count > 0 {
                count.to_string().red()
            } else {
                count.to_string().green()
            };
            println!("{:<width$} | {}", label, count_text, width = max_label_len);
        }

        println!("{}", "-".repeat(max_label_len + 12));
    }
}
