//! Serializable load summary for diagnostics output

use serde::Serialize;
use wfdef_builder::Def;

use crate::config::LoadConfig;
use crate::workflow::WorkflowDef;

/// One recorded failure with its location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedException {
    /// Dotted path from the workflow root
    pub path: String,
    /// Failure message including its cause chain
    pub message: String,
}

/// Summary of a loaded workflow and everything that failed while loading it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub name: String,
    pub version: String,
    pub nodes: usize,
    pub connections: usize,
    pub annotations: usize,
    pub dangling_connections: usize,
    /// Total recorded failures, including those beyond the report limit
    pub exception_count: usize,
    pub exceptions: Vec<ReportedException>,
    /// True if `exceptions` was cut at the report limit
    pub truncated: bool,
}

impl LoadReport {
    /// Summarize `workflow`, listing at most `config.report_limit` exceptions
    #[must_use]
    pub fn new(workflow: &WorkflowDef, config: &LoadConfig) -> Self {
        let all = workflow.flattened_with_paths();
        let limit = config.report_limit.unwrap_or(usize::MAX);
        let exceptions: Vec<ReportedException> = all
            .iter()
            .take(limit)
            .map(|(path, error)| ReportedException {
                path: path.to_string(),
                message: error.to_string(),
            })
            .collect();
        Self {
            name: workflow.name().to_owned(),
            version: workflow.version().to_owned(),
            nodes: workflow.nodes().len(),
            connections: workflow.connections().len(),
            annotations: workflow.annotations().len(),
            dangling_connections: workflow.dangling_connections().count(),
            exception_count: all.len(),
            truncated: exceptions.len() < all.len(),
            exceptions,
        }
    }

    /// True if nothing failed
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.exception_count == 0
    }
}
