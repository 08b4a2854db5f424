//! The reconciliation engine.
//!
//! One `update` run:
//!
//! 1. load the manifest and its freshness token
//! 2. read the existing environment script
//! 3. stop early if the script is at least as new as the manifest and
//!    already holds every secret (unless forced)
//! 4. connect to the remote store if the manifest enables it
//! 5. resolve every secret
//! 6. replace the script
//! 7. propagate the resolved values to the remote store
//!
//! Structural errors in the manifest or script stop the run before any
//! value is resolved, and a failing resolver command stops it before the
//! script is touched.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::context::Context;
use crate::core::envfile::EnvState;
use crate::core::freshness::{is_synced, Freshness};
use crate::core::manifest::Manifest;
use crate::core::remote::{self, PropagationReport};
use crate::core::resolver::{self, Resolved, Source};
use crate::core::script;
use crate::error::{Error, RemoteError, Result};

/// Input and output files of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub manifest: PathBuf,
    pub script: PathBuf,
}

impl Paths {
    pub fn new(manifest: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            script: script.into(),
        }
    }
}

/// What an `update` run did.
#[derive(Debug)]
pub enum Outcome {
    /// The script already reflected the manifest; nothing was resolved or written.
    Skipped,
    /// The script was rewritten.
    Written {
        resolved: Vec<Resolved>,
        /// `None` when remote propagation is disabled.
        propagation: Option<PropagationReport>,
    },
}

/// Bring the environment script in line with the manifest.
///
/// # Errors
///
/// Manifest and script structural errors, resolver command failures and
/// remote authentication failures are fatal. Per-secret propagation
/// failures are reported in the outcome instead.
pub fn reconcile(ctx: &Context, paths: &Paths, force: bool) -> Result<Outcome> {
    let (manifest, manifest_time) = Manifest::load(&paths.manifest)?;
    let state = EnvState::load(&paths.script)?;
    let script_time = Freshness::of(&paths.script)?;

    if !force && is_up_to_date(&manifest, manifest_time, &state, script_time) {
        info!("environment script is up to date");
        return Ok(Outcome::Skipped);
    }
    if force {
        debug!("freshness check bypassed");
    }

    let session = if manifest.options.use_remote_secret_store {
        let store = ctx.store().ok_or_else(|| {
            RemoteError::AuthFailed("no remote secret store configured".to_string())
        })?;
        Some(remote::connect(store)?)
    } else {
        None
    };

    let resolved = resolver::resolve_all(ctx, &manifest, &state)?;
    script::write(&paths.script, &resolved)?;
    info!(path = %paths.script.display(), secrets = resolved.len(), "environment script written");

    let propagation = match (&session, ctx.store()) {
        (Some(session), Some(store)) => Some(remote::propagate(store, session, &resolved)),
        _ => None,
    };

    Ok(Outcome::Written {
        resolved,
        propagation,
    })
}

/// The script is fresh and caches a value for every manifest secret.
fn is_up_to_date(
    manifest: &Manifest,
    manifest_time: Freshness,
    state: &EnvState,
    script_time: Option<Freshness>,
) -> bool {
    if !is_synced(manifest_time, script_time) {
        return false;
    }
    let missing: Vec<&str> = manifest
        .secrets
        .iter()
        .map(|s| s.name())
        .filter(|name| !state.contains(name))
        .collect();
    if !missing.is_empty() {
        debug!(?missing, "script is newer than the manifest but missing values");
        return false;
    }
    true
}

/// Which cached values to drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Names(Vec<String>),
    All,
}

/// What a delete removed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub removed: Vec<String>,
    /// Requested names that had no cached value.
    pub missing: Vec<String>,
}

/// Remove cached values from the environment script.
///
/// The script is rewritten with the remaining values: manifest secrets in
/// manifest order, then any values the manifest no longer names. The next
/// `update` resolves the removed secrets again. Nothing is written when no
/// value was removed.
pub fn delete(paths: &Paths, target: &Target) -> Result<DeleteReport> {
    let (manifest, _) = Manifest::load(&paths.manifest)?;
    let mut state = EnvState::load(&paths.script)?;
    let mut report = DeleteReport::default();

    match target {
        Target::All => {
            report.removed = state.iter().map(|(k, _)| k.to_string()).collect();
            state.clear();
        }
        Target::Names(names) => {
            for name in names {
                match state.remove(name) {
                    Some(_) => report.removed.push(name.clone()),
                    None => {
                        warn!(name = %name, "no cached value to delete");
                        report.missing.push(name.clone());
                    }
                }
            }
        }
    }

    if report.removed.is_empty() {
        return Ok(report);
    }

    let remaining = cached_in_manifest_order(&manifest, &state);
    script::write(&paths.script, &remaining)?;
    debug!(removed = ?report.removed, kept = remaining.len(), "cached values deleted");

    Ok(report)
}

fn cached_in_manifest_order(manifest: &Manifest, state: &EnvState) -> Vec<Resolved> {
    let mut ordered: Vec<Resolved> = manifest
        .secrets
        .iter()
        .filter_map(|secret| {
            state
                .get(secret.name())
                .map(|value| Resolved::new(secret.name(), &secret.description, value, Source::Script))
        })
        .collect();

    ordered.extend(
        state
            .iter()
            .filter(|(name, _)| manifest.get(name).is_none())
            .map(|(name, value)| Resolved::new(name, "", value, Source::Script)),
    );
    ordered
}

/// Per-secret line of a status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretStatus {
    pub name: String,
    pub description: String,
    pub cached: bool,
    /// Where the next update would take the value from.
    pub next: Source,
}

/// Read-only view of where a project stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub manifest_modified: Freshness,
    pub script_modified: Option<Freshness>,
    pub synced: bool,
    pub remote: bool,
    pub secrets: Vec<SecretStatus>,
}

impl Status {
    pub fn cached_count(&self) -> usize {
        self.secrets.iter().filter(|s| s.cached).count()
    }
}

/// Inspect the manifest and script without resolving or writing anything.
pub fn status(paths: &Paths) -> Result<Status> {
    let (manifest, manifest_modified) = Manifest::load(&paths.manifest)?;
    let state = EnvState::load(&paths.script)?;
    let script_modified = Freshness::of(&paths.script).map_err(Error::Io)?;

    let secrets = manifest
        .secrets
        .iter()
        .map(|secret| SecretStatus {
            name: secret.name().to_string(),
            description: secret.description.clone(),
            cached: state.contains(secret.name()),
            next: resolver::plan(secret, &state),
        })
        .collect();

    Ok(Status {
        manifest_modified,
        script_modified,
        synced: is_up_to_date(&manifest, manifest_modified, &state, script_modified),
        remote: manifest.options.use_remote_secret_store,
        secrets,
    })
}

/// Whether `path` looks like it was produced by this tool.
pub fn is_generated_script(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .map(|contents| {
            contents
                .lines()
                .any(|l| l.trim() == crate::core::constants::SECRETS_MARKER)
        })
        .unwrap_or(false)
}
