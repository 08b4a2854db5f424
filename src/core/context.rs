//! Run context.
//!
//! Everything a reconciliation run depends on besides its input files: the
//! settings it was started with and the collaborators that talk to the
//! outside world. Tests swap the collaborators for doubles.

use crate::core::manifest::Secret;
use crate::core::remote::SecretStore;
use crate::core::settings::Settings;
use crate::core::shell::Shell;
use crate::error::Result;

/// Asks the operator for a secret value.
pub trait Prompter {
    /// Return the line typed for `secret`, without its line terminator.
    fn prompt(&self, secret: &Secret) -> Result<String>;
}

/// Collaborators and settings for one run.
pub struct Context {
    settings: Settings,
    verbose: bool,
    shell: Box<dyn Shell>,
    prompter: Box<dyn Prompter>,
    store: Option<Box<dyn SecretStore>>,
}

impl Context {
    pub fn new(settings: Settings, shell: Box<dyn Shell>, prompter: Box<dyn Prompter>) -> Self {
        Self {
            settings,
            verbose: false,
            shell,
            prompter,
            store: None,
        }
    }

    /// Attach the remote secret store used when the manifest asks for propagation.
    pub fn with_store(mut self, store: Box<dyn SecretStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn shell(&self) -> &dyn Shell {
        self.shell.as_ref()
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    pub fn store(&self) -> Option<&dyn SecretStore> {
        self.store.as_deref()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("verbose", &self.verbose)
            .field("store", &self.store.is_some())
            .finish()
    }
}
