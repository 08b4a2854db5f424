//! Freshness tokens for skipping redundant reconciliation.

use std::path::Path;
use std::time::SystemTime;

/// Modification time of a file, compared to decide whether work can be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Freshness(SystemTime);

impl Freshness {
    /// Read the modification time of `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn of(path: &Path) -> std::io::Result<Option<Self>> {
        match std::fs::metadata(path) {
            Ok(meta) => Ok(Some(Self(meta.modified()?))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        Self(time)
    }

    pub fn as_system_time(&self) -> SystemTime {
        self.0
    }
}

/// Whether the script already reflects the manifest.
///
/// A script at least as new as the manifest counts as synced, so equal
/// timestamps skip. A missing script is never synced.
pub fn is_synced(manifest: Freshness, script: Option<Freshness>) -> bool {
    script.is_some_and(|script| script >= manifest)
}
