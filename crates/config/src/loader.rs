use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    env_subst::substitute_env,
    error::{Error, Result},
    schema::QuillConfig,
};

/// Standard config file names, checked in order.
pub const CONFIG_FILENAMES: &[&str] = &["quill.toml", "quill.yaml", "quill.yml", "quill.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<QuillConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./quill.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/quill/quill.{toml,yaml,yml,json}` (user-global)
///
/// Returns `QuillConfig::default()` if no config file is found or the file
/// fails to load.
pub fn discover_and_load() -> QuillConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    QuillConfig::default()
}

/// Load `path` when given, otherwise fall back to [`discover_and_load`].
///
/// An explicit path that cannot be loaded is an error rather than a silent
/// fallback.
pub fn load_or_discover(path: Option<&Path>) -> Result<QuillConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(discover_and_load()),
    }
}

/// Find the first config file in standard locations.
pub(crate) fn find_config_file() -> Option<PathBuf> {
    if let Some(p) = find_in_dir(Path::new(".")) {
        return Some(p);
    }
    config_dir().and_then(|dir| find_in_dir(&dir))
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/quill/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "quill").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<QuillConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::UnsupportedFormat(ext.to_string())),
    }
}
