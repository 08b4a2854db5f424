//! Access-token redaction.
//!
//! Anything shown to the user or written to the log passes through
//! [`redact`] so a personal access token echoed back by `gh`, `git`, or a
//! resolver script never reaches the terminal in full.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// GitHub classic tokens (ghp_, gho_, ghu_, ghs_, ghr_), fine-grained
/// `github_pat_` tokens, and GitLab `glpat-` tokens.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<prefix>gh[pousr]_|github_pat_|glpat-)(?P<body>[A-Za-z0-9_\-]{20,})",
    )
    .expect("token regex is valid")
});

/// Number of token characters left visible after the prefix.
const VISIBLE: usize = 4;

/// Replace credential-shaped tokens in `text`.
///
/// The token prefix and its first few characters are kept so the user can
/// tell which token was involved; the rest is masked.
pub fn redact(text: &str) -> Cow<'_, str> {
    TOKEN_RE.replace_all(text, |caps: &regex::Captures<'_>| {
        let body = &caps["body"];
        let shown: String = body.chars().take(VISIBLE).collect();
        format!("{}{}********", &caps["prefix"], shown)
    })
}
