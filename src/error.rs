//! Error types for devsecrets.
//!
//! Each stage of a reconciliation run has its own error enum; [`Error`]
//! wraps them so callers can propagate with `?` and still match on the
//! stage that failed.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),
}

/// Failures loading the secrets manifest. Always fatal.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no manifest given: pass --input-file")]
    NoPath,

    #[error("failed to read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate secret in manifest: {0}")]
    DuplicateSecret(String),

    #[error("invalid secret in manifest: {0}")]
    InvalidSecret(#[from] ValidationError),
}

/// Structural problems in the persisted environment script. Always fatal.
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("malformed line {line} in environment script: {content}")]
    MalformedLine { line: usize, content: String },

    #[error("duplicate key in environment script: {0}")]
    DuplicateKey(String),
}

/// Failures obtaining a secret value.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("resolver command for {name} failed: {reason}")]
    CommandFailed { name: String, reason: String },
}

/// Remote secret store failures.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("not authenticated with the remote secret store: {0}")]
    AuthFailed(String),

    #[error("could not determine the current repository: {0}")]
    Repository(String),

    #[error("failed to propagate {name}: {reason}")]
    PropagationFailed { name: String, reason: String },

    #[error("unexpected response from remote secret store: {0}")]
    Response(String),
}

/// Subprocess failures.
///
/// When the child wrote to stderr, that text is the message; the bare
/// exit status is only used when stderr was empty.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Failed { program: String, message: String },
}

/// Input validation failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("secret name cannot be empty")]
    EmptyKey,

    #[error("invalid secret name '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
