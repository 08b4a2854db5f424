//! devsecrets - keep local development secrets in sync with a project manifest.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devsecrets::cli::output;
use devsecrets::cli::{execute, Cli};
use devsecrets::core::constants::LOG_ENV;
use devsecrets::error::{Error, ManifestError, RemoteError, ResolveError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.global.verbose {
            EnvFilter::new("devsecrets=debug")
        } else {
            EnvFilter::new("devsecrets=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Manifest(ManifestError::NoPath) => {
                Some("run: devsecrets update --input-file devsecrets.json")
            }
            Error::Env(_) => Some("fix the script by hand or remove it and run update again"),
            Error::Resolve(ResolveError::CommandFailed { .. }) => {
                Some("the environment script was not changed")
            }
            Error::Remote(RemoteError::AuthFailed(_)) => Some("run: gh auth login"),
            Error::Remote(RemoteError::Repository(_)) => {
                Some("run from a clone with an origin remote on GitHub")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
