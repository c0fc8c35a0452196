//! Configuration loading, validation and env substitution.
//!
//! Config files: `quill.toml`, `quill.yaml`, `quill.yml` or `quill.json`,
//! searched in `./` then `~/.config/quill/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-fallback}` substitution in the raw
//! file text.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{CONFIG_FILENAMES, config_dir, discover_and_load, load_config, load_or_discover},
    schema::{DateFormat, GraphqlConfig, MocksConfig, QuillConfig, ServerConfig},
    validate::{Diagnostic, Severity, ValidationResult},
};
