//! Styled console status lines.

use colored::Colorize;
use std::fmt::Display;

pub const SUCCESS: &str = "[SUCCESS]:";
pub const INFO: &str = "[INFO]:";
pub const ERROR: &str = "[ERROR]:";

/// Formats a success line: bold green prefix, message, then reset.
pub fn success_line(message: impl Display) -> String {
    format!("{} {}", SUCCESS.bold().green(), message)
}

/// Formats an informational line: bold yellow prefix, message, then reset.
pub fn info_line(message: impl Display) -> String {
    format!("{} {}", INFO.bold().yellow(), message)
}

/// Formats an error line: bold red prefix, message, then reset.
pub fn error_line(message: impl Display) -> String {
    format!("{} {}", ERROR.bold().red(), message)
}

/// Prints a success line to stdout.
pub fn success(message: impl Display) {
    println!("{}", success_line(message));
}

/// Prints an informational line to stdout.
pub fn info(message: impl Display) {
    println!("{}", info_line(message));
}

/// Prints an error line to stderr.
pub fn error(message: impl Display) {
    eprintln!("{}", error_line(message));
}
