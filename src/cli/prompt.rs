//! Terminal prompter.

use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::core::context::Prompter;
use crate::core::manifest::Secret;
use crate::error::{Error, Result};

/// Prompts on the terminal, or reads one line per secret from piped stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&self, secret: &Secret) -> Result<String> {
        let label = prompt_label(secret);

        if io::stdin().is_terminal() {
            let value = Input::<String>::new()
                .with_prompt(label)
                .allow_empty(true)
                .interact_text()?;
            return Ok(value);
        }

        print!("{}: ", label);
        let _ = io::stdout().flush();

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(Error::Other(format!(
                "no value for {}: stdin closed",
                secret.name()
            )));
        }
        Ok(strip_terminator(&line).to_string())
    }
}

fn prompt_label(secret: &Secret) -> String {
    if secret.description.is_empty() {
        format!("Enter value for {}", secret.name())
    } else {
        format!("Enter value for {} ({})", secret.name(), secret.description)
    }
}

/// Drop the line terminator and nothing else.
fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
