//! `wfdef inspect`: load a workflow file and report what failed to load

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;
use wfdef_builder::BuildMode;
use wfdef_model::{load_workflow, LoadConfig, LoadReport};
use wfdef_settings::SettingsTree;

/// Exit code: loaded without exceptions
pub const EXIT_CLEAN: u8 = 0;
/// Exit code: unreadable input or strict build failure
pub const EXIT_FAILED: u8 = 1;
/// Exit code: loaded, but with recorded exceptions
pub const EXIT_EXCEPTIONS: u8 = 2;

/// Options of the `inspect` command
#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// Workflow file (`.json`, `.yaml`, `.yml`)
    pub file: PathBuf,
    /// Separate file with a `load` section; otherwise the workflow file's own
    pub config: Option<PathBuf>,
    /// Force strict construction
    pub strict: bool,
    /// Override the report limit; 0 lists every exception
    pub report_limit: Option<usize>,
}

/// Load the workflow and summarize it
///
/// # Errors
/// The file cannot be read or parsed, or strict construction failed.
pub fn inspect(options: &InspectOptions) -> Result<LoadReport> {
    let settings = read_settings(&options.file)?;
    let mut config = match &options.config {
        Some(path) => LoadConfig::from_settings(&read_settings(path)?),
        None => LoadConfig::from_settings(&settings),
    }
    .context("invalid load configuration")?;
    if options.strict {
        config = config.with_mode(BuildMode::Strict);
    }
    if let Some(limit) = options.report_limit {
        config = config.with_report_limit((limit > 0).then_some(limit));
    }

    info!(file = %options.file.display(), mode = ?config.mode, "loading workflow");
    let workflow = load_workflow(&settings, &config)
        .with_context(|| format!("cannot load {}", options.file.display()))?;
    Ok(LoadReport::new(&workflow, &config))
}

/// Exit code for a finished inspection
#[must_use]
pub fn exit_code(report: &LoadReport) -> u8 {
    if report.is_clean() {
        EXIT_CLEAN
    } else {
        EXIT_EXCEPTIONS
    }
}

/// Human-readable report
#[must_use]
pub fn render_text(report: &LoadReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Workflow: {} (version {})", report.name, report.version);
    let _ = writeln!(out, "  Nodes: {}", report.nodes);
    let _ = writeln!(out, "  Connections: {}", report.connections);
    if report.dangling_connections > 0 {
        let _ = writeln!(out, "    dangling: {}", report.dangling_connections);
    }
    let _ = writeln!(out, "  Annotations: {}", report.annotations);
    let _ = writeln!(out);
    if report.is_clean() {
        let _ = writeln!(out, "Load exceptions: none");
        return out;
    }
    let _ = writeln!(out, "Load exceptions: {}", report.exception_count);
    for e in &report.exceptions {
        let _ = writeln!(out, "  {}: {}", e.path, e.message);
    }
    if report.truncated {
        let _ = writeln!(
            out,
            "  ... {} more",
            report.exception_count - report.exceptions.len()
        );
    }
    out
}

/// JSON report
///
/// # Errors
/// Serialization failure.
pub fn render_json(report: &LoadReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("cannot serialize report")
}

fn read_settings(path: &Path) -> Result<SettingsTree> {
    SettingsTree::from_path(path).with_context(|| format!("cannot read {}", path.display()))
}
