//! Command-line interface.

pub mod completions;
pub mod delete;
pub mod output;
pub mod prompt;
pub mod status;
pub mod update;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::core::constants::SCRIPT_FILE;
use crate::core::reconcile::Paths;
use crate::core::settings::{Rule, Setting, Settings};
use crate::error::{Error, ManifestError, Result};

/// devsecrets - keep local development secrets in sync with a manifest.
#[derive(Parser)]
#[command(
    name = "devsecrets",
    about = "Keep local development secrets in sync with a project manifest",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: Global,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct Global {
    /// Secrets manifest (JSON)
    #[arg(short, long, global = true, env = "DEVSECRETS_INPUT_FILE")]
    pub input_file: Option<PathBuf>,

    /// Environment script to maintain [default: ~/.devsecrets.sh]
    #[arg(long, global = true, env = "DEVSECRETS_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Echo what is being done
    #[arg(short, long, global = true, env = "DEVSECRETS_VERBOSE")]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Resolve every secret in the manifest and rewrite the environment script
    Update {
        /// Ignore modification times and always re-check every secret
        #[arg(short, long)]
        force: bool,
    },

    /// Forget cached values so the next update resolves them again
    Delete {
        /// Secret to forget (repeatable)
        #[arg(short, long, required_unless_present = "all")]
        name: Vec<String>,
        /// Forget every cached value
        #[arg(long, conflicts_with = "name")]
        all: bool,
    },

    /// Show settings, freshness, and where each value comes from
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Execute a CLI command.
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Update { force } => update::execute(&cli.global, force),
        Command::Delete { name, all } => delete::execute(&cli.global, name, all),
        Command::Status => status::execute(&cli.global),
        Command::Completions { shell } => completions::execute(shell),
    }
}

impl Global {
    /// Script path, defaulting to `~/.devsecrets.sh`.
    pub fn script_path(&self) -> Result<PathBuf> {
        match &self.script {
            Some(path) => Ok(path.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(SCRIPT_FILE))
                .ok_or_else(|| Error::Other("cannot determine home directory".to_string())),
        }
    }

    /// The run settings, validated.
    pub fn settings(&self, force: bool) -> Result<Settings> {
        let input = self
            .input_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let home = dirs::home_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let settings = Settings::new(vec![
            Setting::new(
                "input-file",
                input,
                "secrets manifest",
                Rule::ExistingFile,
            ),
            Setting::new(
                "script",
                self.script_path()?.display().to_string(),
                "environment script",
                Rule::WritablePath,
            ),
            Setting::new("verbose", self.verbose.to_string(), "echo actions", Rule::Bool),
            Setting::new("force", force.to_string(), "ignore modification times", Rule::Bool),
            Setting::new("home", home, "home directory", Rule::Any).hidden(),
        ])
        .validated();

        for setting in settings.visible() {
            debug!(setting = %setting, "setting");
        }
        Ok(settings)
    }

    /// Manifest and script paths for a run.
    ///
    /// # Errors
    ///
    /// `ManifestError::NoPath` without `--input-file`, `ManifestError::NotFound`
    /// if it does not exist, and a settings error for any other invalid value.
    pub fn paths(&self, settings: &Settings) -> Result<Paths> {
        let manifest = self.input_file.clone().ok_or(ManifestError::NoPath)?;
        if !manifest.is_file() {
            return Err(ManifestError::NotFound(manifest).into());
        }

        let invalid: Vec<String> = settings.invalid().map(|s| s.to_string()).collect();
        if !invalid.is_empty() {
            return Err(Error::Other(format!("invalid settings: {}", invalid.join(", "))));
        }

        Ok(Paths::new(manifest, self.script_path()?))
    }
}
