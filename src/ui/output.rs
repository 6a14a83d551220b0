//! Output functions for consistent message formatting.
//!
//! These functions replace ad-hoc println! calls with semantic output.

use colored::Colorize;
use std::io::IsTerminal;

use super::style::*;

// ──────────────────────────────────────────────────────────────
// Primary output functions
// ──────────────────────────────────────────────────────────────

/// Print bold success message: "✓ {message}" in bold green
pub fn success_bold(message: &str) {
    println!("{} {}", MARK_SUCCESS.green().bold(), message.green().bold());
}

/// Print error message: "✗ {message}" in red
pub fn error(message: &str) {
    println!("{} {}", MARK_ERROR.red(), message);
}

/// Print error message to stderr: "✗ {message}" in red
pub fn error_stderr(message: &str) {
    eprintln!("{} {}", MARK_ERROR.red(), message);
}

/// Print info message: "ℹ {message}" in blue
pub fn info(message: &str) {
    println!("{} {}", MARK_INFO.blue(), message);
}

/// Print indented item: "  • {message}"
pub fn bullet(message: &str) {
    println!("  {} {}", MARK_BULLET, message);
}

/// Print indented success: "  ✓ {message}" in green
pub fn bullet_success(message: &str) {
    println!("  {} {}", MARK_SUCCESS.green(), message);
}

// ──────────────────────────────────────────────────────────────
// TTY-aware output
// ──────────────────────────────────────────────────────────────

/// Print blank line only in TTY mode
pub fn blank() {
    if std::io::stdout().is_terminal() {
        println!();
    }
}
