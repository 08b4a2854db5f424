//! Test fixtures and constants.

/// Manifest file name used by the CLI helpers.
pub const MANIFEST_FILE: &str = "devsecrets.json";

/// Two prompted secrets.
pub const PROMPT_MANIFEST: &str = r#"{
    "secrets": [
        { "environmentVariable": "DATABASE_URL", "description": "Database connection string" },
        { "environmentVariable": "API_KEY", "description": "API key" }
    ]
}"#;

/// One command-resolved secret and one prompted secret.
pub const MIXED_MANIFEST: &str = r#"{
    "secrets": [
        { "environmentVariable": "FROM_COMMAND", "description": "from a command", "shellscript": "echo noise; echo resolved-value" },
        { "environmentVariable": "FROM_PROMPT", "description": "typed in" }
    ]
}"#;

/// A resolver command that fails.
pub const FAILING_MANIFEST: &str = r#"{
    "secrets": [
        { "environmentVariable": "GOOD", "description": "fine", "shellscript": "echo ok" },
        { "environmentVariable": "BAD", "description": "broken", "shellscript": "echo boom >&2; exit 7" }
    ]
}"#;

/// Remote propagation enabled.
pub const REMOTE_MANIFEST: &str = r#"{
    "options": { "useGitHubUserSecrets": true },
    "secrets": [
        { "environmentVariable": "TOKEN_A", "description": "first", "shellscript": "echo a-value" },
        { "environmentVariable": "TOKEN_B", "description": "second", "shellscript": "echo b-value" }
    ]
}"#;

/// Script with a preamble that must not be parsed and one cached value.
pub const CACHED_SCRIPT: &str = "#!/bin/bash\nNOT_A_SECRET=1\n# START SECRETS\n# Database connection string\nDATABASE_URL=\"postgres://cached\"\nexport DATABASE_URL\n";
