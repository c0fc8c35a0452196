//! Configuration validation.
//!
//! Detects unknown or misspelled keys, type errors, and settings that parse
//! but cannot work (inverted mock ranges, an empty bind address).

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use crate::schema::QuillConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding about a config file.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// "syntax", "unknown-field", "type-error", "range" or "file-ref".
    pub category: &'static str,
    /// Dotted key path such as `mocks.list_max`; empty for whole-file findings.
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn error(category: &'static str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            category,
            path: path.into(),
            message: message.into(),
        }
    }

    fn warning(category: &'static str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(category, path, message)
        }
    }

    fn info(category: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            ..Self::error(category, "", message)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    /// File that was checked, if any.
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    fn single(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
            config_path: None,
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

// ── Known keys ──────────────────────────────────────────────────────────────

enum KnownKeys {
    Section(HashMap<&'static str, KnownKeys>),
    Value,
}

impl KnownKeys {
    fn section<const N: usize>(keys: [(&'static str, KnownKeys); N]) -> Self {
        Self::Section(HashMap::from(keys))
    }

    fn values<const N: usize>(keys: [&'static str; N]) -> Self {
        Self::Section(keys.into_iter().map(|k| (k, Self::Value)).collect())
    }
}

/// Every key `QuillConfig` accepts.
fn known_keys() -> KnownKeys {
    KnownKeys::section([
        ("server", KnownKeys::values(["bind", "port"])),
        (
            "graphql",
            KnownKeys::values(["enabled", "graphiql", "date_format"]),
        ),
        (
            "mocks",
            KnownKeys::values([
                "enabled",
                "seed",
                "int_min",
                "int_max",
                "float_min",
                "float_max",
                "list_min",
                "list_max",
            ]),
        ),
    ])
}

// ── Suggestions ─────────────────────────────────────────────────────────────

/// Edit distance between `a` and `b`, counted in chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let target: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in target.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[target.len()]
}

/// Closest known key within `max_distance` edits, if any.
fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, levenshtein(needle, c)))
        .filter(|(_, d)| (1..=max_distance).contains(d))
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

// ── Validation ──────────────────────────────────────────────────────────────

/// Validate the config file at `path`, or the discovered one when `path` is
/// `None`.
#[must_use]
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let Some(path) = path
        .map(Path::to_path_buf)
        .or_else(crate::loader::find_config_file)
    else {
        return ValidationResult::single(Diagnostic::info(
            "file-ref",
            "no config file found; using defaults",
        ));
    };

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    let mut result = match std::fs::read_to_string(&path) {
        Ok(raw) => validate_str(&crate::env_subst::substitute_env(&raw), ext),
        Err(e) => ValidationResult::single(Diagnostic::error(
            "file-ref",
            "",
            format!("cannot read {}: {e}", path.display()),
        )),
    };
    result.config_path = Some(path);
    result
}

fn parse_to_json(raw: &str, ext: &str) -> Result<serde_json::Value, String> {
    match ext {
        "toml" => toml::from_str::<toml::Value>(raw)
            .map_err(|e| e.to_string())
            .and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| e.to_string()),
        "json" => serde_json::from_str(raw).map_err(|e| e.to_string()),
        other => Err(format!("unsupported config format: .{other}")),
    }
}

/// Validate config text in the format named by `ext` ("toml", "yaml", "yml",
/// "json") without touching the file system.
#[must_use]
pub fn validate_str(raw: &str, ext: &str) -> ValidationResult {
    let value = match parse_to_json(raw, ext) {
        Ok(value) => value,
        Err(message) => return ValidationResult::single(Diagnostic::error("syntax", "", message)),
    };

    let mut diagnostics = Vec::new();
    check_unknown_keys(&value, &known_keys(), "", &mut diagnostics);

    match serde_json::from_value::<QuillConfig>(value) {
        Ok(config) => check_semantics(&config, &mut diagnostics),
        Err(e) => diagnostics.push(Diagnostic::error("type-error", "", e.to_string())),
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

fn check_unknown_keys(
    value: &serde_json::Value,
    known: &KnownKeys,
    prefix: &str,
    out: &mut Vec<Diagnostic>,
) {
    let (serde_json::Value::Object(table), KnownKeys::Section(keys)) = (value, known) else {
        return;
    };

    let names: Vec<&str> = keys.keys().copied().collect();
    for (key, child) in table {
        let path = match prefix {
            "" => key.clone(),
            _ => format!("{prefix}.{key}"),
        };
        match keys.get(key.as_str()) {
            Some(child_keys) => check_unknown_keys(child, child_keys, &path, out),
            None => {
                let message = suggest(key, &names, 3).map_or_else(
                    || "unknown field".to_string(),
                    |s| format!("unknown field (did you mean \"{s}\"?)"),
                );
                out.push(Diagnostic::error("unknown-field", path, message));
            },
        }
    }
}

fn check_semantics(config: &QuillConfig, out: &mut Vec<Diagnostic>) {
    let mocks = &config.mocks;
    if mocks.int_min > mocks.int_max {
        out.push(Diagnostic::error(
            "range",
            "mocks.int_min",
            format!("int_min ({}) exceeds int_max ({})", mocks.int_min, mocks.int_max),
        ));
    }
    let floats_ok = mocks.float_min.is_finite()
        && mocks.float_max.is_finite()
        && mocks.float_min <= mocks.float_max;
    if !floats_ok {
        out.push(Diagnostic::error(
            "range",
            "mocks.float_min",
            format!(
                "float range [{}, {}] is not a finite, ordered range",
                mocks.float_min, mocks.float_max
            ),
        ));
    }
    if mocks.list_min > mocks.list_max {
        out.push(Diagnostic::error(
            "range",
            "mocks.list_min",
            format!(
                "list_min ({}) exceeds list_max ({})",
                mocks.list_min, mocks.list_max
            ),
        ));
    }
    if config.server.bind.trim().is_empty() {
        out.push(Diagnostic::error("range", "server.bind", "bind address is empty"));
    }
    if config.server.port == 0 {
        out.push(Diagnostic::warning(
            "range",
            "server.port",
            "port 0 binds a random free port",
        ));
    }
}
