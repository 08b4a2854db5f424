//! Remote secret propagation.
//!
//! After the environment script is written, resolved values can be pushed
//! to a remote secret store (GitHub Codespaces user secrets). A user secret
//! is readable by a set of repositories; propagation only ever adds the
//! current repository to that set, so bindings made from other projects
//! survive.
//!
//! ## Adding a New Store
//!
//! 1. Implement the `SecretStore` trait
//! 2. Add the implementation in a new file next to `github.rs`
//! 3. Construct it in the CLI where the context is built

pub mod github;

use std::fmt;
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use crate::core::redact::redact;
use crate::core::resolver::Resolved;
use crate::error::{Error, RemoteError, Result};

pub use github::GitHubCli;

/// An `owner/name` repository reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Repository names are case-insensitive on the remote.
    pub fn same_as(&self, other: &Repository) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner) && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Access token for the remote store. Never printed; wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Result of asking which repositories can read a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The secret exists and is bound to these repositories.
    Found(Vec<Repository>),
    /// The secret has never been set.
    NotSet,
}

/// Remote secret store collaborator.
pub trait SecretStore {
    /// Whether a login session already exists.
    fn is_authenticated(&self) -> Result<bool>;

    /// Run the interactive login flow.
    fn login(&self) -> Result<()>;

    /// Token used for read queries.
    fn credential(&self) -> Result<Credential>;

    /// The repository the current project belongs to.
    fn current_repository(&self) -> Result<Repository>;

    /// Repositories currently allowed to read `name`.
    fn list_repositories(&self, name: &str, credential: &Credential) -> Result<Lookup>;

    /// Set `name` to `value`, readable by exactly `repositories`.
    fn set_secret(&self, name: &str, value: &str, repositories: &[Repository]) -> Result<()>;
}

/// Authenticated state for one run.
#[derive(Debug)]
pub struct Session {
    pub repository: Repository,
    pub credential: Credential,
}

/// Outcome of a propagation pass.
#[derive(Debug, Default)]
pub struct PropagationReport {
    /// Secrets that were set remotely.
    pub pushed: Vec<String>,
    /// Per-secret failures; the rest of the pass continued.
    pub failed: Vec<RemoteError>,
}

impl PropagationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Make sure the store is logged in and gather what every secret needs.
///
/// Runs the login flow once if there is no session.
///
/// # Errors
///
/// `RemoteError::AuthFailed` if login fails or still leaves no session;
/// `RemoteError::Repository` if the current repository is unknown.
pub fn connect(store: &dyn SecretStore) -> Result<Session> {
    let authenticated = store.is_authenticated().map_err(auth_failed)?;
    if !authenticated {
        info!("not logged in to the remote secret store, starting login");
        store.login().map_err(auth_failed)?;
        if !store.is_authenticated().map_err(auth_failed)? {
            return Err(RemoteError::AuthFailed("login did not complete".to_string()).into());
        }
    }

    let credential = store.credential().map_err(auth_failed)?;
    let repository = store.current_repository()?;
    debug!(repository = %repository, "remote session ready");

    Ok(Session {
        repository,
        credential,
    })
}

fn auth_failed(e: Error) -> Error {
    match e {
        e @ Error::Remote(RemoteError::AuthFailed(_)) => e,
        other => RemoteError::AuthFailed(redact(&other.to_string()).into_owned()).into(),
    }
}

/// Add `current` to `existing` unless it is already there.
///
/// Existing bindings keep their order; nothing is ever removed.
pub fn merge_bindings(existing: Vec<Repository>, current: &Repository) -> Vec<Repository> {
    let mut merged = existing;
    if !merged.iter().any(|r| r.same_as(current)) {
        merged.push(current.clone());
    }
    merged
}

/// Push every resolved secret to the store.
///
/// A failure for one secret is recorded and logged, and the pass moves on
/// to the next secret.
pub fn propagate(
    store: &dyn SecretStore,
    session: &Session,
    secrets: &[Resolved],
) -> PropagationReport {
    let mut report = PropagationReport::default();

    for secret in secrets {
        match propagate_one(store, session, secret) {
            Ok(()) => {
                debug!(name = %secret.name, "propagated");
                report.pushed.push(secret.name.clone());
            }
            Err(e) => {
                let reason = redact(&e.to_string()).into_owned();
                warn!(name = %secret.name, %reason, "propagation failed");
                report.failed.push(RemoteError::PropagationFailed {
                    name: secret.name.clone(),
                    reason,
                });
            }
        }
    }

    report
}

fn propagate_one(store: &dyn SecretStore, session: &Session, secret: &Resolved) -> Result<()> {
    let existing = match store.list_repositories(&secret.name, &session.credential)? {
        Lookup::Found(repositories) => repositories,
        Lookup::NotSet => Vec::new(),
    };
    let repositories = merge_bindings(existing, &session.repository);
    store.set_secret(&secret.name, &secret.value, &repositories)
}
