//! Update command - reconcile the environment script with the manifest.

use crate::cli::output;
use crate::cli::prompt::TerminalPrompter;
use crate::cli::status::print_settings;
use crate::cli::Global;
use crate::core::context::Context;
use crate::core::reconcile::{self, Outcome};
use crate::core::remote::{GitHubCli, PropagationReport};
use crate::core::shell::System;
use crate::error::Result;

/// Resolve every secret and rewrite the script if anything changed.
pub fn execute(global: &Global, force: bool) -> Result<()> {
    let settings = global.settings(force)?;
    let paths = global.paths(&settings)?;

    let ctx = Context::new(settings, Box::new(System), Box::new(TerminalPrompter))
        .with_store(Box::new(GitHubCli::new()))
        .with_verbose(global.verbose);

    match reconcile::reconcile(&ctx, &paths, force)? {
        Outcome::Skipped => {
            output::success(&format!(
                "secrets in {} have not changed",
                paths.manifest.display()
            ));
            output::hint("run: devsecrets update --force to re-check every secret");
        }
        Outcome::Written {
            resolved,
            propagation,
        } => {
            for secret in resolved.iter().filter(|s| s.is_empty_command_value()) {
                output::warn(&format!(
                    "resolver command for {} produced no output",
                    output::key(&secret.name)
                ));
            }

            if ctx.verbose() {
                print_settings(ctx.settings());
                output::section("Sources");
                for secret in &resolved {
                    output::kv(&secret.name, secret.source);
                }
                println!();
            }
            output::success(&format!(
                "wrote {} to {}",
                output::count(resolved.len(), "secret", "secrets"),
                output::path(&paths.script.display().to_string())
            ));

            if let Some(report) = propagation {
                print_propagation(&report);
            }
            output::hint(&format!("run: source {}", paths.script.display()));
        }
    }

    Ok(())
}

fn print_propagation(report: &PropagationReport) {
    if !report.pushed.is_empty() {
        output::success(&format!(
            "updated {}",
            output::count(report.pushed.len(), "GitHub user secret", "GitHub user secrets")
        ));
    }
    for failure in &report.failed {
        output::warn(&failure.to_string());
    }
}
