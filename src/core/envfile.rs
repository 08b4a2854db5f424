//! Environment script reader.
//!
//! Recovers previously resolved values from the generated script so that
//! repeat runs do not re-prompt. Only the section after
//! [`SECRETS_MARKER`](crate::core::constants::SECRETS_MARKER) is read.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::core::constants::SECRETS_MARKER;
use crate::core::validation::validate_key;
use crate::error::{EnvError, Result};

/// Values persisted in an existing environment script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvState {
    values: BTreeMap<String, String>,
}

impl EnvState {
    /// Read the script at `path`.
    ///
    /// A missing file is a first run and yields an empty state.
    ///
    /// # Errors
    ///
    /// `EnvError::MalformedLine` or `EnvError::DuplicateKey` for structural
    /// problems, or an IO error if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no environment script yet");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let state = Self::parse(&contents)?;
        debug!(path = %path.display(), values = state.len(), "environment script loaded");
        Ok(state)
    }

    /// Parse script text.
    ///
    /// Everything before the marker is shell preamble and ignored. After it,
    /// blank lines, comments and `export` lines are skipped and every other
    /// line must be `KEY=VALUE`.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut values = BTreeMap::new();
        let mut in_secrets = false;

        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();

            if line.starts_with(SECRETS_MARKER) {
                in_secrets = true;
                continue;
            }
            if !in_secrets {
                continue;
            }
            if line.is_empty() || line.starts_with('#') || line.starts_with("export ") {
                continue;
            }

            let malformed = || EnvError::MalformedLine {
                line: idx + 1,
                content: line.to_string(),
            };

            let (key, value) = line.split_once('=').ok_or_else(malformed)?;
            let key = key.trim();
            validate_key(key).map_err(|_| malformed())?;

            if values.contains_key(key) {
                return Err(EnvError::DuplicateKey(key.to_string()).into());
            }
            values.insert(key.to_string(), parse_value(value.trim()));
        }

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for EnvState {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

fn parse_value(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return unescape_double_quoted(&raw[1..raw.len() - 1]);
    }

    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }

    raw.to_string()
}

/// Undo the escaping bash applies inside double quotes.
fn unescape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some(c @ ('"' | '\\' | '$' | '`')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
