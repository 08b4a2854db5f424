//! Core library components.
//!
//! The reconciliation engine and the collaborators it talks to: manifest
//! and script files, subprocesses, the terminal prompt, and the remote
//! secret store.

pub mod constants;
pub mod context;
pub mod envfile;
pub mod freshness;
pub mod manifest;
pub mod reconcile;
pub mod redact;
pub mod remote;
pub mod resolver;
pub mod script;
pub mod settings;
pub mod shell;
pub mod validation;
