//! Constants used throughout devsecrets.
//!
//! Centralizes magic strings and configuration values.

/// Default environment script name, relative to HOME (~/.devsecrets.sh).
pub const SCRIPT_FILE: &str = ".devsecrets.sh";

/// Marker line separating the script preamble from the secret assignments.
pub const SECRETS_MARKER: &str = "# START SECRETS";

/// Preamble written before the marker.
///
/// Codespaces injects user secrets itself, so the local script bails out there.
pub const SCRIPT_PREAMBLE: &str = "#!/bin/bash

# if we are running in codespaces, we don't load the local environment
if [[ $CODESPACES == true ]]; then
    return 0
fi

";

/// Environment variable consulted for the tracing filter.
pub const LOG_ENV: &str = "DEVSECRETS_LOG";

/// Scopes requested when logging in to GitHub.
pub const GH_LOGIN_SCOPES: &str = "user,repo,codespace:secrets";

/// The GitHub app that user secrets are scoped to.
pub const GH_SECRET_APP: &str = "codespaces";
