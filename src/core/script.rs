//! Environment script writer.
//!
//! The script is a pure function of the resolved secrets: same input, same
//! bytes. It is always replaced as a whole so a reader never sees a
//! half-written file.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::constants::{SCRIPT_PREAMBLE, SECRETS_MARKER};
use crate::core::resolver::Resolved;
use crate::error::Result;

/// Render the script text for `secrets`, in the order given.
pub fn render(secrets: &[Resolved]) -> String {
    let mut output = String::from(SCRIPT_PREAMBLE);
    output.push_str(SECRETS_MARKER);
    output.push('\n');

    for secret in secrets {
        output.push_str(&format!(
            "# {}\n{}=\"{}\"\nexport {}\n",
            single_line(&secret.description),
            secret.name,
            escape_value(&secret.value),
            secret.name
        ));
    }

    output
}

/// Replace the script at `path` with the rendered secrets.
///
/// Writes to a temporary file in the same directory and renames it over
/// the target. On Unix the result is readable by the owner only.
///
/// # Errors
///
/// Returns an IO error if the directory is not writable or the rename fails.
pub fn write(path: &Path, secrets: &[Resolved]) -> Result<()> {
    let content = render(secrets);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    debug!(path = %path.display(), secrets = secrets.len(), "writing environment script");

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    Ok(())
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Escape characters that bash interprets inside double quotes.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '$' => escaped.push_str("\\$"),
            '`' => escaped.push_str("\\`"),
            _ => escaped.push(ch),
        }
    }

    escaped
}
