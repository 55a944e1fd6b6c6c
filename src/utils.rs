//! # Formatting Helpers
//!
//! Small formatters used by the console summary. Report content itself is
//! produced as structured data; these only shape numbers for a terminal.

use colored::*;

use crate::severity::{OverheadSeverity, Verdict};

/// Format a percent change with an explicit sign
///
/// ```rust
/// # use recorder_impact::utils::format_impact;
/// assert_eq!(format_impact(1.234), "+1.23%");
/// assert_eq!(format_impact(-0.5), "-0.50%");
/// assert_eq!(format_impact(0.0), "+0.00%");
/// ```
pub fn format_impact(impact_pct: f64) -> String {
    let sign = if impact_pct >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, impact_pct)
}

/// Format a latency in milliseconds
pub fn format_ms(ms: f64) -> String {
    format!("{:.2}ms", ms)
}

/// Format a signed latency change in milliseconds
pub fn format_delta_ms(ms: f64) -> String {
    format!("{:+.2}ms", ms)
}

/// Format an integer count with thousands separators
///
/// ```rust
/// # use recorder_impact::utils::format_count;
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(-4200), "-4,200");
/// ```
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Colour a severity label for the terminal
pub fn colorize_severity(severity: OverheadSeverity) -> ColoredString {
    let label = severity.to_string();
    match severity {
        OverheadSeverity::Negligible | OverheadSeverity::Low => label.green(),
        OverheadSeverity::Moderate | OverheadSeverity::High => label.yellow(),
        OverheadSeverity::Severe => label.red(),
    }
}

/// Colour a regression verdict for the terminal
pub fn colorize_verdict(verdict: Verdict) -> ColoredString {
    let label = verdict.to_string();
    match verdict {
        Verdict::Pass => label.green(),
        Verdict::Warning => label.yellow(),
        Verdict::Fail => label.red(),
    }
}

/// Print a separator line the width of the summary
pub fn print_separator(width: usize) {
    println!("{}", "=".repeat(width));
}
