//! Secrets manifest loading.
//!
//! The manifest is a JSON file checked into the project that names every
//! secret a developer needs, how to describe it, and optionally a command
//! that can produce its value.

use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::core::freshness::Freshness;
use crate::core::validation::validate_key;
use crate::error::{ManifestError, Result};

/// Parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub secrets: Vec<Secret>,
}

/// Manifest-wide options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Propagate resolved values to the user's GitHub Codespaces secrets.
    #[serde(default, rename = "useGitHubUserSecrets")]
    pub use_remote_secret_store: bool,
}

/// One required secret.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    /// Environment variable name; unique within the manifest.
    pub environment_variable: String,
    #[serde(default)]
    pub description: String,
    /// Command whose last non-blank output line is the value.
    #[serde(default, rename = "shellscript", deserialize_with = "non_empty")]
    pub resolver_command: Option<String>,
}

impl Secret {
    pub fn name(&self) -> &str {
        &self.environment_variable
    }
}

fn non_empty<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

impl Manifest {
    /// Load a manifest and its freshness token.
    ///
    /// # Errors
    ///
    /// `ManifestError::NoPath` for an empty path, `ManifestError::NotFound`
    /// when the file is absent, and `ManifestError::Parse` (or a
    /// duplicate/invalid-name variant) when the content does not match the
    /// schema.
    pub fn load(path: &Path) -> Result<(Self, Freshness)> {
        if path.as_os_str().is_empty() {
            return Err(ManifestError::NoPath.into());
        }
        debug!(path = %path.display(), "loading manifest");

        let freshness = Freshness::of(path)
            .map_err(|source| ManifestError::Read {
                path: path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| ManifestError::NotFound(path.to_path_buf()))?;

        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::parse(&contents)?;

        debug!(
            secrets = manifest.secrets.len(),
            remote = manifest.options.use_remote_secret_store,
            "manifest loaded"
        );
        Ok((manifest, freshness))
    }

    /// Parse and validate manifest JSON.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(contents).map_err(ManifestError::Parse)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reject invalid or repeated secret names.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for secret in &self.secrets {
            validate_key(secret.name()).map_err(ManifestError::InvalidSecret)?;
            if !seen.insert(secret.name()) {
                return Err(ManifestError::DuplicateSecret(secret.name().to_string()).into());
            }
        }
        Ok(())
    }

    /// Look up a secret by name.
    pub fn get(&self, name: &str) -> Option<&Secret> {
        self.secrets.iter().find(|s| s.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "options": { "useGitHubUserSecrets": true },
        "secrets": [
            { "environmentVariable": "API_KEY", "description": "the api key", "shellscript": "" },
            { "environmentVariable": "DB_URL", "description": "database", "shellscript": "./get-db.sh" }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let manifest = Manifest::parse(SAMPLE).unwrap();

        assert!(manifest.options.use_remote_secret_store);
        assert_eq!(manifest.secrets.len(), 2);
        assert_eq!(manifest.secrets[0].name(), "API_KEY");
        assert_eq!(manifest.secrets[0].resolver_command, None);
        assert_eq!(
            manifest.secrets[1].resolver_command.as_deref(),
            Some("./get-db.sh")
        );
    }

    #[test]
    fn test_options_default_to_local_only() {
        let manifest =
            Manifest::parse(r#"{ "secrets": [ { "environmentVariable": "A" } ] }"#).unwrap();
        assert!(!manifest.options.use_remote_secret_store);
        assert_eq!(manifest.secrets[0].description, "");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = Manifest::parse("{ not json").unwrap_err();
        assert!(matches!(err, Error::Manifest(ManifestError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let err = Manifest::parse(r#"{ "secrets": "nope" }"#).unwrap_err();
        assert!(matches!(err, Error::Manifest(ManifestError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        let err = Manifest::parse(
            r#"{ "secrets": [ { "environmentVariable": "A" }, { "environmentVariable": "A" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Manifest(ManifestError::DuplicateSecret(ref name)) if name == "A"
        ));
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        let err =
            Manifest::parse(r#"{ "secrets": [ { "environmentVariable": "NOT-VALID" } ] }"#)
                .unwrap_err();
        assert!(matches!(err, Error::Manifest(ManifestError::InvalidSecret(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = Manifest::load(&tmp.path().join("devsecrets.json")).unwrap_err();
        assert!(matches!(err, Error::Manifest(ManifestError::NotFound(_))));
    }

    #[test]
    fn test_load_empty_path() {
        let err = Manifest::load(Path::new("")).unwrap_err();
        assert!(matches!(err, Error::Manifest(ManifestError::NoPath)));
    }

    #[test]
    fn test_load_returns_freshness() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("devsecrets.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let (manifest, freshness) = Manifest::load(&path).unwrap();
        assert_eq!(manifest.secrets.len(), 2);
        assert_eq!(Some(freshness), Freshness::of(&path).unwrap());
    }
}
