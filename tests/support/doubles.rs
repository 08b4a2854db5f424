//! In-memory doubles for the engine's collaborators.
//!
//! Each double hands out a cloneable handle to its shared state so a test
//! can inspect what happened after the context has taken ownership.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use devsecrets::core::context::{Context, Prompter};
use devsecrets::core::manifest::Secret;
use devsecrets::core::remote::{Credential, Lookup, Repository, SecretStore};
use devsecrets::core::settings::Settings;
use devsecrets::core::shell::{command_line, CommandOutput, Shell, System};
use devsecrets::error::{CommandError, Error, RemoteError, Result};

/// Runs real processes and records every command line.
#[derive(Clone, Default)]
pub struct RecordingShell {
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl RecordingShell {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Shell for RecordingShell {
    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        envs: &[(&str, &str)],
    ) -> std::result::Result<CommandOutput, CommandError> {
        self.calls.borrow_mut().push(command_line(program, args));
        System.run_with_env(program, args, envs)
    }

    fn run_tee(
        &self,
        program: &str,
        args: &[&str],
    ) -> std::result::Result<CommandOutput, CommandError> {
        self.calls.borrow_mut().push(command_line(program, args));
        System.run_tee(program, args)
    }

    fn run_attached(&self, program: &str, args: &[&str]) -> std::result::Result<(), CommandError> {
        self.calls.borrow_mut().push(command_line(program, args));
        Ok(())
    }
}

/// Answers prompts from a queue and records which secrets were asked for.
#[derive(Clone, Default)]
pub struct ScriptedPrompter {
    answers: Rc<RefCell<VecDeque<String>>>,
    pub asked: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Rc::new(RefCell::new(answers.iter().map(|s| s.to_string()).collect())),
            asked: Rc::default(),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&self, secret: &Secret) -> Result<String> {
        self.asked.borrow_mut().push(secret.name().to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::Other(format!("unexpected prompt for {}", secret.name())))
    }
}

/// Shared state behind [`FakeStore`].
#[derive(Default)]
pub struct StoreState {
    pub authenticated: bool,
    /// Whether `login` establishes a session.
    pub login_succeeds: bool,
    pub logins: usize,
    pub auth_checks: usize,
    pub repository: Option<Repository>,
    pub bindings: HashMap<String, Vec<Repository>>,
    pub values: HashMap<String, String>,
    /// Secrets whose `set_secret` call fails.
    pub reject: HashSet<String>,
    pub set_calls: Vec<(String, Vec<String>)>,
}

/// Remote store that keeps bindings in memory.
#[derive(Clone, Default)]
pub struct FakeStore {
    pub state: Rc<RefCell<StoreState>>,
}

impl FakeStore {
    /// Logged in, working from `repository`.
    pub fn logged_in(repository: &str) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.borrow_mut();
            state.authenticated = true;
            state.login_succeeds = true;
            state.repository = Repository::parse(repository);
        }
        store
    }

    /// Pre-existing binding for `name`.
    pub fn bind(&self, name: &str, repositories: &[&str]) {
        let repos = repositories.iter().filter_map(|r| Repository::parse(r)).collect();
        self.state.borrow_mut().bindings.insert(name.to_string(), repos);
    }

    pub fn bound(&self, name: &str) -> Option<Vec<String>> {
        let credential = Credential::new("test-token");
        match self.list_repositories(name, &credential).ok()? {
            Lookup::Found(repos) => Some(repos.iter().map(Repository::full_name).collect()),
            Lookup::NotSet => None,
        }
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.state.borrow().values.get(name).cloned()
    }
}

impl SecretStore for FakeStore {
    fn is_authenticated(&self) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        state.auth_checks += 1;
        Ok(state.authenticated)
    }

    fn login(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.logins += 1;
        if state.login_succeeds {
            state.authenticated = true;
            Ok(())
        } else {
            Err(CommandError::Failed {
                program: "gh".to_string(),
                message: "login cancelled".to_string(),
            }
            .into())
        }
    }

    fn credential(&self) -> Result<Credential> {
        Ok(Credential::new("test-token"))
    }

    fn current_repository(&self) -> Result<Repository> {
        self.state
            .borrow()
            .repository
            .clone()
            .ok_or_else(|| RemoteError::Repository("no origin".to_string()).into())
    }

    fn list_repositories(&self, name: &str, _credential: &Credential) -> Result<Lookup> {
        Ok(match self.state.borrow().bindings.get(name) {
            Some(repos) => Lookup::Found(repos.clone()),
            None => Lookup::NotSet,
        })
    }

    fn set_secret(&self, name: &str, value: &str, repositories: &[Repository]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.set_calls.push((
            name.to_string(),
            repositories.iter().map(Repository::full_name).collect(),
        ));
        if state.reject.contains(name) {
            return Err(RemoteError::Response(format!("HTTP 422 for {}", name)).into());
        }
        state.bindings.insert(name.to_string(), repositories.to_vec());
        state.values.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Context wired to the given doubles.
pub fn context(shell: &RecordingShell, prompter: &ScriptedPrompter) -> Context {
    Context::new(
        Settings::default(),
        Box::new(shell.clone()),
        Box::new(prompter.clone()),
    )
}

/// Context with a remote store attached.
pub fn remote_context(
    shell: &RecordingShell,
    prompter: &ScriptedPrompter,
    store: &FakeStore,
) -> Context {
    context(shell, prompter).with_store(Box::new(store.clone()))
}
