use rand::Rng;
use serde::Serialize;

use crate::level::Level;

// ---------------------------------------------------------------------------
// Fixed text
// ---------------------------------------------------------------------------

pub const SUCCESS_BANNER: &str = "✓ EXPLOIT SUCCESSFUL!";
pub const LEVEL_COMPLETE: &str = "[+] Level complete!";
pub const HINT_NUDGE: &str = "Hint: Try the hint button for guidance";

/// One of these follows the echo of every rejected command.
pub const FAILURE_MESSAGES: [&str; 5] = [
    "Error: Command not recognized",
    "[!] Access denied - insufficient privileges",
    "[!] Target not vulnerable with this command",
    "[-] Exploit failed - try a different approach",
    "Error: Invalid parameters for this tool",
];

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Echo line for a submitted command. The command is not modified.
pub fn echo(command: &str) -> String {
    format!("> {command}")
}

/// Console lines for an accepted command. Deterministic.
pub fn success_output(command: &str, level: &Level) -> Vec<String> {
    vec![
        echo(command),
        String::new(),
        SUCCESS_BANNER.to_string(),
        format!("[+] Vulnerability exploited: {}", level.vulnerability_class()),
        format!("[+] Access granted to: {}", level.title),
        LEVEL_COMPLETE.to_string(),
        String::new(),
    ]
}

/// Console lines for a rejected command using failure message
/// `message_index` (taken modulo the pool size).
pub fn failure_output(command: &str, message_index: usize) -> Vec<String> {
    vec![
        echo(command),
        FAILURE_MESSAGES[message_index % FAILURE_MESSAGES.len()].to_string(),
        HINT_NUDGE.to_string(),
        String::new(),
    ]
}

/// Console lines for a validation outcome. Failures draw their message
/// uniformly from [`FAILURE_MESSAGES`] using `rng`.
pub fn format_output<R: Rng + ?Sized>(
    command: &str,
    outcome: bool,
    level: &Level,
    rng: &mut R,
) -> Vec<String> {
    if outcome {
        success_output(command, level)
    } else {
        failure_output(command, rng.gen_range(0..FAILURE_MESSAGES.len()))
    }
}

// ---------------------------------------------------------------------------
// Line styling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Success,
    Error,
    Prompt,
    Plain,
}

/// How a front end should style a console line.
pub fn classify_line(line: &str) -> LineKind {
    if line.contains('✓') || line.contains("[+]") {
        LineKind::Success
    } else if line.contains("[!]") || line.contains("Error") {
        LineKind::Error
    } else if line.starts_with('>') {
        LineKind::Prompt
    } else {
        LineKind::Plain
    }
}
