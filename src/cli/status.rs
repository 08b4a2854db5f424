//! Status command - settings, freshness, and value sources at a glance.

use chrono::{DateTime, Local};

use crate::cli::output;
use crate::cli::Global;
use crate::core::freshness::Freshness;
use crate::core::reconcile;
use crate::core::settings::Settings;
use crate::error::Result;

/// Show where the project stands without resolving anything.
pub fn execute(global: &Global) -> Result<()> {
    let settings = global.settings(false)?;

    print_settings(&settings);

    let paths = global.paths(&settings)?;
    let status = reconcile::status(&paths)?;

    output::section("Files");
    output::kv("manifest", timestamp(status.manifest_modified));
    match status.script_modified {
        Some(modified) => output::kv("script  ", timestamp(modified)),
        None => output::kv("script  ", "not written yet"),
    }
    if status.script_modified.is_some() && !reconcile::is_generated_script(&paths.script) {
        output::warn(&format!(
            "{} was not written by devsecrets",
            output::path(&paths.script.display().to_string())
        ));
    }
    output::kv("remote  ", if status.remote { "GitHub user secrets" } else { "off" });

    output::section("Secrets");
    if status.secrets.is_empty() {
        output::dimmed("no secrets in manifest");
    }
    for secret in &status.secrets {
        let state = if secret.cached { "cached" } else { "missing" };
        output::list_item(&format!(
            "{}  {}, next from {}",
            output::key(&secret.name),
            state,
            secret.next
        ));
    }

    println!();
    if status.synced {
        output::success(&format!(
            "up to date ({}/{} cached)",
            status.cached_count(),
            status.secrets.len()
        ));
    } else {
        output::warn(&format!(
            "out of date ({}/{} cached)",
            status.cached_count(),
            status.secrets.len()
        ));
        output::hint("run: devsecrets update");
    }

    Ok(())
}

fn timestamp(freshness: Freshness) -> String {
    let time: DateTime<Local> = freshness.as_system_time().into();
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Print the visible settings with their validity markers.
pub(crate) fn print_settings(settings: &Settings) {
    output::section("Settings");
    for setting in settings.visible() {
        output::kv(
            &format!("{} {}", setting.validity.marker(), setting.name),
            &setting.value,
        );
    }
}
