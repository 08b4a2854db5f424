//! Value resolution.
//!
//! Every manifest secret gets a value from the first source that has one:
//!
//! 1. the existing environment script,
//! 2. the secret's resolver command,
//! 3. an interactive prompt.
//!
//! Repeat runs therefore neither re-run commands nor re-prompt for values
//! that are already cached.

use std::fmt;
use tracing::debug;
use zeroize::Zeroize;

use crate::core::context::Context;
use crate::core::envfile::EnvState;
use crate::core::manifest::{Manifest, Secret};
use crate::core::redact::redact;
use crate::error::{ResolveError, Result};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Reused from the existing environment script.
    Script,
    /// Last non-blank output line of the resolver command.
    Command,
    /// Typed by the operator.
    Prompt,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Script => "cached",
            Self::Command => "command",
            Self::Prompt => "prompt",
        })
    }
}

/// A secret with its value for this run.
///
/// The value is wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Resolved {
    pub name: String,
    pub description: String,
    pub value: String,
    pub source: Source,
}

impl Resolved {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        value: impl Into<String>,
        source: Source,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value: value.into(),
            source,
        }
    }

    /// Resolver produced nothing; the operator should hear about it.
    pub fn is_empty_command_value(&self) -> bool {
        self.source == Source::Command && self.value.is_empty()
    }
}

impl Drop for Resolved {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Resolve every manifest secret, in manifest order.
///
/// # Errors
///
/// Stops at the first failing resolver command with
/// `ResolveError::CommandFailed`; nothing resolved so far is returned, so a
/// partial set can never be written.
pub fn resolve_all(ctx: &Context, manifest: &Manifest, state: &EnvState) -> Result<Vec<Resolved>> {
    manifest
        .secrets
        .iter()
        .map(|secret| resolve(ctx, secret, state))
        .collect()
}

/// Resolve a single secret.
pub fn resolve(ctx: &Context, secret: &Secret, state: &EnvState) -> Result<Resolved> {
    let name = secret.name();

    if let Some(value) = state.get(name) {
        debug!(name, "reusing cached value");
        return Ok(Resolved::new(name, &secret.description, value, Source::Script));
    }

    if let Some(command) = &secret.resolver_command {
        debug!(name, "running resolver command");
        let output = ctx
            .shell()
            .run_tee("sh", &["-c", command.as_str()])
            .map_err(|e| ResolveError::CommandFailed {
                name: name.to_string(),
                reason: redact(&e.to_string()).into_owned(),
            })?;

        let value = last_non_blank_line(&output.stdout).unwrap_or_default();
        if value.is_empty() {
            debug!(name, "resolver command produced no output");
        }
        return Ok(Resolved::new(name, &secret.description, value, Source::Command));
    }

    debug!(name, "prompting for value");
    let value = ctx.prompter().prompt(secret)?;
    Ok(Resolved::new(name, &secret.description, value, Source::Prompt))
}

/// Which source `resolve` would use for `secret`, without running anything.
pub fn plan(secret: &Secret, state: &EnvState) -> Source {
    if state.contains(secret.name()) {
        Source::Script
    } else if secret.resolver_command.is_some() {
        Source::Command
    } else {
        Source::Prompt
    }
}

/// The last line of `output` that is not whitespace-only.
///
/// A trailing carriage return is dropped; the line is otherwise verbatim.
pub fn last_non_blank_line(output: &str) -> Option<&str> {
    output
        .lines()
        .rev()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .find(|line| !line.trim().is_empty())
}
