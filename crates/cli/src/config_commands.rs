use std::path::Path;

use anyhow::Result;

use quill_config::validate::{self, Diagnostic, Severity};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31m",
        Severity::Warning => "\x1b[33m",
        Severity::Info => "\x1b[36m",
    }
}

fn render(d: &Diagnostic) -> String {
    let label = format!("{BOLD}{}{}{RESET}", color(d.severity), d.severity);
    if d.path.is_empty() {
        format!("  {label} {}", d.message)
    } else {
        format!("  {label} {} [{}]: {}", d.path, d.category, d.message)
    }
}

/// `quill check-config`: print diagnostics for the config file and exit 1 if
/// any of them is an error. Info lines only show with `--verbose`.
pub fn check(path: Option<&Path>, verbose: bool) -> Result<()> {
    let result = validate::validate(path);

    match &result.config_path {
        Some(path) => eprintln!("Checking {}\n", path.display()),
        None => eprintln!("No config file found; checking defaults.\n"),
    }

    let lines: Vec<String> = result
        .diagnostics
        .iter()
        .filter(|d| verbose || d.severity != Severity::Info)
        .map(render)
        .collect();
    for line in &lines {
        eprintln!("{line}");
    }
    if !lines.is_empty() {
        eprintln!();
    }

    match (
        result.count(Severity::Error),
        result.count(Severity::Warning),
    ) {
        (0, 0) => eprintln!("No issues found."),
        (errors, warnings) => eprintln!("{errors} error(s), {warnings} warning(s)"),
    }

    if result.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}
