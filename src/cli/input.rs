//! Reading passwords and validated forms from the terminal

use crate::forms::Validation;
use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{BufRead, Write};

/// Fail with every field issue on its own line
pub(super) fn ensure_valid(validation: &Validation) -> Result<()> {
    if validation.is_valid() {
        return Ok(());
    }
    let lines: Vec<String> = validation
        .issues()
        .iter()
        .map(|issue| format!("  {}", issue))
        .collect();
    bail!("Form geçersiz:\n{}", lines.join("\n"))
}

/// Ask for a secret without echoing it
pub(super) fn read_secret(prompt: &str) -> Result<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{}", prompt)?;
    stderr.flush()?;

    enable_raw_mode().context("Password input needs a terminal; use --password-stdin")?;
    let result = read_hidden_line();
    disable_raw_mode()?;
    writeln!(stderr)?;
    result
}

fn read_hidden_line() -> Result<String> {
    let mut line = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(line),
            KeyCode::Esc => bail!("Cancelled"),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                bail!("Cancelled")
            }
            KeyCode::Char(c) => line.push(c),
            KeyCode::Backspace => {
                line.pop();
            }
            _ => {}
        }
    }
}

/// Read `count` lines, without their line endings
pub(super) fn read_lines(reader: impl BufRead, count: usize) -> Result<Vec<String>> {
    let lines = reader
        .lines()
        .take(count)
        .collect::<std::io::Result<Vec<_>>>()
        .context("Failed to read standard input")?;
    if lines.len() < count {
        bail!("Expected {} line(s) on standard input, got {}", count, lines.len());
    }
    Ok(lines
        .into_iter()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect())
}

/// Secrets from the first lines of stdin, or asked for one by one
pub(super) fn read_secrets(from_stdin: bool, prompts: &[&str]) -> Result<Vec<String>> {
    if from_stdin {
        read_lines(std::io::stdin().lock(), prompts.len())
    } else {
        prompts.iter().map(|prompt| read_secret(prompt)).collect()
    }
}
