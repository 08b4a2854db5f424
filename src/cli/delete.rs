//! Delete command - forget cached values.

use crate::cli::output;
use crate::cli::Global;
use crate::core::reconcile::{self, Target};
use crate::error::Result;

/// Remove the named (or all) cached values from the environment script.
pub fn execute(global: &Global, names: Vec<String>, all: bool) -> Result<()> {
    let settings = global.settings(false)?;
    let paths = global.paths(&settings)?;

    let target = if all {
        Target::All
    } else {
        Target::Names(names)
    };

    let report = reconcile::delete(&paths, &target)?;

    for name in &report.missing {
        output::warn(&format!("{} has no cached value", output::key(name)));
    }

    if report.removed.is_empty() {
        output::dimmed("nothing to delete");
        return Ok(());
    }

    for name in &report.removed {
        output::list_item(name);
    }
    output::success(&format!(
        "deleted {}",
        output::count(report.removed.len(), "cached value", "cached values")
    ));
    output::hint("run: devsecrets update to resolve them again");

    Ok(())
}
