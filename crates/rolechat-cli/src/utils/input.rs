//! User input utilities for interactive command-line prompts.
//!
//! This module provides functions for collecting chat messages and
//! confirmations. Readers and writers are injected so conversations can be
//! driven from tests.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use crate::error::CliError;

/// Words that end an interactive conversation.
const EXIT_COMMANDS: [&str; 4] = ["exit", "quit", "/exit", "/quit"];

/// Print `prompt` and read one line.
///
/// Returns `None` at end of input. The trailing newline is removed; other
/// whitespace is preserved for [`validate_message`] to judge.
pub fn read_line<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(writer, "{prompt}: ")?;
    writer.flush()?;

    let mut input = String::new();
    let read = reader
        .read_line(&mut input)
        .context("Failed to read user input")?;
    if read == 0 {
        return Ok(None);
    }

    Ok(Some(input.trim_end_matches(['\n', '\r']).to_string()))
}

/// Reject empty or whitespace-only messages; return the trimmed message.
pub fn validate_message(input: &str) -> Result<&str, CliError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CliError::Arguments("message cannot be empty".to_string()));
    }
    Ok(trimmed)
}

/// Whether the input asks to leave the conversation.
pub fn is_exit_command(input: &str) -> bool {
    let trimmed = input.trim();
    EXIT_COMMANDS
        .iter()
        .any(|cmd| trimmed.eq_ignore_ascii_case(cmd))
}

/// Prompts the user for a yes/no confirmation on stdin.
///
/// Accepts 'y', 'yes', 'n', 'no' (case insensitive).
/// Empty input is treated as 'no'.
pub fn prompt_confirmation(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let answer = read_line(&mut stdin.lock(), &mut stdout, &format!("{prompt} [y/N]"))?;
    Ok(answer.as_deref().is_some_and(parse_confirmation))
}

fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_validate_message_rejects_blank() {
        assert!(validate_message("").is_err());
        assert!(validate_message("   \t ").is_err());
        assert_eq!(validate_message("  Hello  ").unwrap(), "Hello");
    }

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command(" QUIT "));
        assert!(is_exit_command("/exit"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("Hello"));
    }

    #[test]
    fn test_read_line_strips_newline_and_reports_eof() {
        let mut reader = Cursor::new("Hello there\r\n");
        let mut out = Vec::new();

        let line = read_line(&mut reader, &mut out, "You").unwrap();
        assert_eq!(line.as_deref(), Some("Hello there"));
        assert_eq!(String::from_utf8(out).unwrap(), "You: ");

        let eof = read_line(&mut reader, &mut Vec::new(), "You").unwrap();
        assert!(eof.is_none());
    }

    #[test]
    fn test_parse_confirmation() {
        assert!(parse_confirmation("y"));
        assert!(parse_confirmation("YES"));
        assert!(!parse_confirmation(""));
        assert!(!parse_confirmation("no"));
        assert!(!parse_confirmation("maybe"));
    }
}
