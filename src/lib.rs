//! devsecrets - keep a local environment script in sync with a project's
//! secrets manifest.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── update        # Reconcile the script with the manifest
//! │   ├── delete        # Drop cached values
//! │   ├── status        # Show settings, freshness and sources
//! │   ├── prompt        # Terminal prompter
//! │   ├── output        # Styled terminal output
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── manifest      # devsecrets.json loading
//!     ├── envfile       # Existing script reader
//!     ├── freshness     # Modification-time comparison
//!     ├── resolver      # cached -> command -> prompt fallback
//!     ├── script        # Deterministic script writer
//!     ├── reconcile     # The update/delete/status engine
//!     ├── remote/       # Remote secret stores
//!     │   ├── mod       # SecretStore trait and additive merge
//!     │   └── github    # gh CLI implementation
//!     ├── shell         # Subprocess collaborator
//!     ├── settings      # Validated run settings
//!     ├── context       # Run context
//!     └── redact        # Token redaction
//! ```
//!
//! # Features
//!
//! - Repeat runs reuse cached values and never re-prompt
//! - Per-secret resolver commands
//! - Atomic, owner-only script writes
//! - Additive propagation to GitHub Codespaces user secrets

pub mod cli;
pub mod core;
pub mod error;
