//! GitHub Codespaces user secrets, via the `gh` CLI.
//!
//! ## Requirements
//!
//! - `gh` must be installed and on `PATH`
//! - the login needs the `user`, `repo` and `codespace:secrets` scopes
//! - the project must have an `origin` remote pointing at GitHub

use serde::Deserialize;
use tracing::{debug, trace};

use super::{Credential, Lookup, Repository, SecretStore};
use crate::core::constants::{GH_LOGIN_SCOPES, GH_SECRET_APP};
use crate::core::shell::{Shell, System};
use crate::error::{CommandError, RemoteError, Result};

/// `gh`-backed secret store.
pub struct GitHubCli {
    shell: Box<dyn Shell>,
    check_installed: bool,
}

impl GitHubCli {
    /// Store that runs the real `gh` and `git` binaries.
    pub fn new() -> Self {
        Self {
            shell: Box::new(System),
            check_installed: true,
        }
    }

    /// Store that runs its commands through `shell`.
    pub fn with_shell(shell: Box<dyn Shell>) -> Self {
        Self {
            shell,
            check_installed: false,
        }
    }

    fn ensure_installed(&self) -> Result<()> {
        if self.check_installed && which::which("gh").is_err() {
            return Err(RemoteError::AuthFailed(
                "gh CLI not found. Install it from https://cli.github.com/".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

impl Default for GitHubCli {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for GitHubCli {
    fn is_authenticated(&self) -> Result<bool> {
        self.ensure_installed()?;
        match self.shell.run("gh", &["auth", "status"]) {
            Ok(_) => Ok(true),
            Err(CommandError::Failed { message, .. }) => {
                trace!(%message, "gh auth status reported no session");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn login(&self) -> Result<()> {
        self.ensure_installed()?;
        self.shell
            .run_attached("gh", &["auth", "login", "--scopes", GH_LOGIN_SCOPES])?;
        Ok(())
    }

    fn credential(&self) -> Result<Credential> {
        let output = self.shell.run("gh", &["auth", "token"])?;
        let token = output.stdout.trim();
        if token.is_empty() || token == "no oauth token" {
            return Err(RemoteError::AuthFailed("gh returned no token".to_string()).into());
        }
        Ok(Credential::new(token))
    }

    fn current_repository(&self) -> Result<Repository> {
        let output = self
            .shell
            .run("git", &["config", "--get", "remote.origin.url"])
            .map_err(|e| RemoteError::Repository(e.to_string()))?;
        let url = output.stdout.trim();

        parse_remote_url(url).ok_or_else(|| {
            RemoteError::Repository(format!("unrecognized origin url: {}", url)).into()
        })
    }

    fn list_repositories(&self, name: &str, credential: &Credential) -> Result<Lookup> {
        let endpoint = format!("/user/codespaces/secrets/{}/repositories", name);
        let result = self.shell.run_with_env(
            "gh",
            &[
                "api",
                "-H",
                "Accept: application/vnd.github+json",
                endpoint.as_str(),
            ],
            &[("GH_TOKEN", credential.expose())],
        );

        let output = match result {
            Ok(output) => output,
            Err(CommandError::Failed { message, .. }) if message.contains("HTTP 404") => {
                debug!(name, "secret not set remotely yet");
                return Ok(Lookup::NotSet);
            }
            Err(e) => return Err(e.into()),
        };

        let listing: RepositoryList = serde_json::from_str(&output.stdout)
            .map_err(|e| RemoteError::Response(e.to_string()))?;

        let repositories = listing
            .repositories
            .iter()
            .map(|entry| {
                Repository::parse(&entry.full_name).ok_or_else(|| {
                    RemoteError::Response(format!("bad repository name: {}", entry.full_name))
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(name, bound = repositories.len(), "listed secret bindings");
        Ok(Lookup::Found(repositories))
    }

    fn set_secret(&self, name: &str, value: &str, repositories: &[Repository]) -> Result<()> {
        let repos = repositories
            .iter()
            .map(Repository::full_name)
            .collect::<Vec<_>>()
            .join(",");

        self.shell.run(
            "gh",
            &[
                "secret",
                "set",
                name,
                "--user",
                "--app",
                GH_SECRET_APP,
                "--body",
                value,
                "--repos",
                repos.as_str(),
            ],
        )?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RepositoryList {
    #[serde(default)]
    repositories: Vec<RepositoryEntry>,
}

#[derive(Debug, Deserialize)]
struct RepositoryEntry {
    full_name: String,
}

/// Extract `owner/name` from a git remote URL.
///
/// Handles `https://host/owner/repo(.git)`, `ssh://git@host/owner/repo`
/// and `git@host:owner/repo(.git)`.
pub fn parse_remote_url(url: &str) -> Option<Repository> {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    let path = if let Some((_, rest)) = url.split_once("://") {
        rest.split_once('/')?.1
    } else {
        url.split_once(':')?.1
    };

    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let name = segments.next()?;
    let owner = segments.next()?;
    Some(Repository::new(owner, name))
}
