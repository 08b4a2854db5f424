//! Subprocess execution.
//!
//! Every external program (resolver commands, `gh`, `git`) runs through the
//! [`Shell`] trait so the reconciliation engine can be driven by test
//! doubles. All calls block until the child exits; there is no timeout.

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use tracing::debug;

use crate::core::redact::redact;
use crate::error::CommandError;

/// Captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Subprocess collaborator.
pub trait Shell {
    /// Run `program` with stdin inherited and stdout/stderr captured.
    ///
    /// A non-zero exit is an error; if the program wrote to stderr, that
    /// text is the error message.
    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> Result<CommandOutput, CommandError>;

    /// Run `program` while echoing its stdout to the terminal as it is captured.
    ///
    /// Stdin and stderr are inherited, so the program may talk to the user.
    /// Output that is not valid UTF-8 is captured lossily.
    fn run_tee(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;

    /// Run `program` fully attached to the terminal.
    fn run_attached(&self, program: &str, args: &[&str]) -> Result<(), CommandError>;

    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        self.run_with_env(program, args, &[])
    }
}

/// Runs real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct System;

impl Shell for System {
    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> Result<CommandOutput, CommandError> {
        log_invocation(program, args);

        let output = Command::new(program)
            .args(args)
            .envs(envs.iter().copied())
            .stdin(Stdio::inherit())
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let captured = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(failure(program, &captured.stderr, output.status));
        }
        Ok(captured)
    }

    fn run_tee(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        log_invocation(program, args);

        let spawn_err = |source: std::io::Error| CommandError::Spawn {
            program: program.to_string(),
            source,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_err)?;

        let mut raw = Vec::new();
        let mut read_error = None;
        if let Some(stdout) = child.stdout.take() {
            let mut reader = BufReader::new(stdout);
            let mut terminal = std::io::stdout();
            let mut line = Vec::new();
            loop {
                line.clear();
                match reader.read_until(b'\n', &mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        // echo failures must not lose the captured value
                        let _ = terminal.write_all(&line);
                        raw.extend_from_slice(&line);
                    }
                    Err(e) => {
                        read_error = Some(e);
                        break;
                    }
                }
            }
            let _ = terminal.flush();
        }

        // the child is reaped even when its output could not be read
        let status = child.wait().map_err(spawn_err)?;
        if let Some(e) = read_error {
            return Err(CommandError::Failed {
                program: program.to_string(),
                message: format!("failed to read output of {}: {}", program, e),
            });
        }
        if !status.success() {
            return Err(failure(program, "", status));
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&raw).into_owned(),
            stderr: String::new(),
        })
    }

    fn run_attached(&self, program: &str, args: &[&str]) -> Result<(), CommandError> {
        log_invocation(program, args);

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(failure(program, "", status));
        }
        Ok(())
    }
}

fn failure(program: &str, stderr: &str, status: std::process::ExitStatus) -> CommandError {
    let stderr = stderr.trim();
    let message = if stderr.is_empty() {
        format!("{} exited with {}", program, status)
    } else {
        stderr.to_string()
    };
    CommandError::Failed {
        program: program.to_string(),
        message,
    }
}

fn log_invocation(program: &str, args: &[&str]) {
    debug!("running {}", redact(&command_line(program, args)));
}

/// Render a command line for display, quoting arguments that contain spaces.
///
/// The argument following `--body` is a secret value and is masked.
pub fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    let mut previous = "";
    for &arg in args {
        line.push(' ');
        if previous == "--body" {
            line.push_str("********");
        } else if arg.contains(' ') {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
        previous = arg;
    }
    line
}
