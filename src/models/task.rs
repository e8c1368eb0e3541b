//! Work-unit model: one file to check, mutated exactly once with its result.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::LintFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Classifies what went wrong for a single file.
pub enum ErrorKind {
    /// The interpreter parsed the file and reported a syntax error.
    Syntax,
    /// The interpreter could not be invoked for this file.
    Invoker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Structured failure for one file: message plus optional source line.
pub struct LintError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: Option<u32>,
}

impl LintError {
    pub fn syntax(message: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            message: message.into(),
            line,
        }
    }

    pub fn invoker(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Invoker,
            message: message.into(),
            line: None,
        }
    }
}

#[derive(Debug)]
/// A single unit of lint work, claimed by exactly one worker.
///
/// `error` starts unset and is written at most once, after the check
/// completed. Tasks are never re-enqueued: a failed task moves into the
/// queue's failure collection, a passing task is dropped.
pub struct LintTask {
    file: PathBuf,
    error: Option<LintError>,
}

impl LintTask {
    pub fn new(file: PathBuf) -> Self {
        Self { file, error: None }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Record the check result. Each task is processed once, so a second
    /// write would indicate a double-claimed task.
    pub fn set_error(&mut self, error: LintError) {
        debug_assert!(self.error.is_none(), "task checked twice: {:?}", self.file);
        self.error = Some(error);
    }

    pub fn error(&self) -> Option<&LintError> {
        self.error.as_ref()
    }

    /// Convert into a report row; `None` for a task that passed.
    pub fn into_failure(self) -> Option<LintFailure> {
        let file = self.file.to_string_lossy().into_owned();
        self.error.map(|e| LintFailure {
            file,
            message: e.message,
            line: e.line,
            kind: e.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_set_once_then_visible() {
        let mut task = LintTask::new(PathBuf::from("/tmp/a.php"));
        assert!(task.error().is_none());
        task.set_error(LintError::syntax("Parse error: oops", Some(3)));
        assert_eq!(task.error().unwrap().line, Some(3));
    }

    #[test]
    fn test_into_failure_maps_fields() {
        let mut task = LintTask::new(PathBuf::from("/tmp/bad.php"));
        task.set_error(LintError::syntax("Parse error: unexpected token", Some(7)));
        let failure = task.into_failure().unwrap();
        assert_eq!(failure.file, "/tmp/bad.php");
        assert_eq!(failure.line, Some(7));
        assert_eq!(failure.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_passing_task_yields_no_failure() {
        let task = LintTask::new(PathBuf::from("/tmp/good.php"));
        assert!(task.into_failure().is_none());
    }
}
