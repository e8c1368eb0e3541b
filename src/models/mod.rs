//! Shared data models for the lint pass and its report output.

pub mod task;

pub use task::{ErrorKind, LintError, LintTask};

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
/// A single failed check with its message and optional source line.
pub struct LintFailure {
    pub file: String,
    pub message: String,
    pub line: Option<u32>,
    pub kind: ErrorKind,
}

#[derive(Serialize)]
/// Aggregated lint summary used by printers.
pub struct Summary {
    pub checked: usize,
    pub failures: usize,
    pub duration_ms: u64,
}

#[derive(Serialize)]
/// Lint results container.
pub struct LintReport {
    pub failures: Vec<LintFailure>,
    pub summary: Summary,
}
