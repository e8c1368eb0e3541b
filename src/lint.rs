//! Lint pass driver: expands patterns into PHP targets, feeds the worker
//! pool, and assembles the report.
//!
//! Produces a `LintReport` plus a vector of non-fatal walk errors (bad
//! patterns, unreadable paths). Individual file failures never abort the
//! pass; the only fatal condition is the pool failing to start.

use crate::config::Effective;
use crate::invoker::{PhpInterpreter, SyntaxChecker};
use crate::models::{LintReport, Summary};
use crate::runner::{LintRunner, RunError};
use glob::glob;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Build the interpreter handle from the resolved configuration.
pub fn php_interpreter(eff: &Effective) -> PhpInterpreter {
    PhpInterpreter::new(eff.php_binary.clone())
        .with_args(eff.php_args.clone())
        .with_error_reporting(eff.error_reporting)
}

/// Run the full pass with the configured PHP interpreter.
pub fn run_lint(eff: &Effective) -> Result<(LintReport, Vec<String>), RunError> {
    run_lint_with_checker(eff, Arc::new(php_interpreter(eff)))
}

/// Run the full pass with an injected checker. Separated from `run_lint`
/// so tests can substitute fakes for the external interpreter.
pub fn run_lint_with_checker(
    eff: &Effective,
    checker: Arc<dyn SyntaxChecker>,
) -> Result<(LintReport, Vec<String>), RunError> {
    let started = Instant::now();
    let mut errors: Vec<String> = Vec::new();
    let targets = collect_targets(&eff.repo_root, &eff.patterns, &mut errors);

    let runner = LintRunner::new(checker, eff.threads);
    for file in targets {
        runner.add_file(file);
    }
    let mut failures = runner.run()?;

    // The pool guarantees no ordering; sort for a deterministic report.
    for failure in &mut failures {
        failure.file = display_path(Path::new(&failure.file), &eff.repo_root);
    }
    failures.sort_by(|a, b| a.file.cmp(&b.file).then(a.message.cmp(&b.message)));

    let report = LintReport {
        summary: Summary {
            checked: runner.checked_count(),
            failures: failures.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        },
        failures,
    };
    Ok((report, errors))
}

/// Expand glob patterns relative to the repo root into a deduplicated,
/// sorted set of PHP files. Pattern and read errors are collected, not
/// fatal.
fn collect_targets(root: &Path, patterns: &[String], errors: &mut Vec<String>) -> Vec<PathBuf> {
    let mut targets: BTreeSet<PathBuf> = BTreeSet::new();
    for pat in patterns {
        let abs = root.join(pat);
        let pattern = abs.to_string_lossy().to_string();
        match glob(&pattern) {
            Ok(paths) => {
                for entry in paths {
                    match entry {
                        Ok(path) if is_php_file(&path) => {
                            targets.insert(path);
                        }
                        Ok(_) => {}
                        Err(e) => errors.push(format!("unreadable path under '{pat}': {e}")),
                    }
                }
            }
            Err(e) => errors.push(format!("invalid pattern '{pat}': {e}")),
        }
    }
    targets.into_iter().collect()
}

fn is_php_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("php"))
}

/// Render a path relative to the repo root when possible.
fn display_path(path: &Path, root: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::{CheckOutcome, InvokerError};
    use crate::models::LintError;
    use std::fs;
    use tempfile::tempdir;

    struct SuffixChecker {
        fail_suffix: &'static str,
    }

    impl SyntaxChecker for SuffixChecker {
        fn check(&self, file: &Path) -> Result<CheckOutcome, InvokerError> {
            if file.to_string_lossy().ends_with(self.fail_suffix) {
                Ok(CheckOutcome::Fail(LintError::syntax(
                    "Parse error: unexpected token",
                    Some(2),
                )))
            } else {
                Ok(CheckOutcome::Pass)
            }
        }
    }

    fn effective(root: &Path, patterns: Vec<String>) -> Effective {
        Effective {
            repo_root: root.to_path_buf(),
            threads: 3,
            output: "human".into(),
            patterns,
            php_binary: "php".into(),
            php_args: Vec::new(),
            error_reporting: None,
        }
    }

    #[test]
    fn test_run_lint_checks_matching_php_files_only() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/good.php"), "<?php echo 1;\n").unwrap();
        fs::write(root.join("src/bad.php"), "<?php if {\n").unwrap();
        fs::write(root.join("src/notes.txt"), "not php\n").unwrap();

        let eff = effective(root, vec!["**/*.php".into()]);
        let checker = Arc::new(SuffixChecker {
            fail_suffix: "bad.php",
        });
        let (report, errors) = run_lint_with_checker(&eff, checker).unwrap();

        assert!(errors.is_empty());
        assert_eq!(report.summary.checked, 2);
        assert_eq!(report.summary.failures, 1);
        // Paths are rendered relative to the repo root.
        assert_eq!(report.failures[0].file, "src/bad.php");
        assert_eq!(report.failures[0].line, Some(2));
    }

    #[test]
    fn test_overlapping_patterns_deduplicate_targets() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.php"), "<?php\n").unwrap();

        let eff = effective(root, vec!["*.php".into(), "a.php".into()]);
        let checker = Arc::new(SuffixChecker { fail_suffix: ".no" });
        let (report, _) = run_lint_with_checker(&eff, checker).unwrap();
        assert_eq!(report.summary.checked, 1);
    }

    #[test]
    fn test_invalid_pattern_is_collected_not_fatal() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.php"), "<?php\n").unwrap();

        let eff = effective(root, vec!["[".into(), "*.php".into()]);
        let checker = Arc::new(SuffixChecker { fail_suffix: ".no" });
        let (report, errors) = run_lint_with_checker(&eff, checker).unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("invalid pattern"));
        assert_eq!(report.summary.checked, 1);
    }

    #[test]
    fn test_empty_target_set_yields_empty_report() {
        let dir = tempdir().unwrap();
        let eff = effective(dir.path(), vec!["**/*.php".into()]);
        let checker = Arc::new(SuffixChecker { fail_suffix: ".no" });
        let (report, errors) = run_lint_with_checker(&eff, checker).unwrap();
        assert!(errors.is_empty());
        assert_eq!(report.summary.checked, 0);
        assert!(report.failures.is_empty());
    }
}
