//! Invocation of the PHP interpreter in syntax-check mode (`php -l`) and
//! classification of its output.
//!
//! A normal syntax error is a *value* (`CheckOutcome::Fail`), never an `Err`.
//! `InvokerError` is reserved for infrastructure problems: the binary is
//! missing or the process cannot be spawned.

use crate::models::LintError;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

/// Output line prefixes PHP uses for fatal conditions. With `html_errors`
/// enabled the keyword arrives wrapped in `<b>` tags instead.
const ERROR_IDENTIFIERS: &[&str] = &["Parse error", "Fatal error", "Error"];

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of one syntax check.
pub enum CheckOutcome {
    Pass,
    Fail(LintError),
}

#[derive(Debug)]
/// The checker could not be invoked at all, as opposed to a file failing
/// its check.
pub enum InvokerError {
    /// The interpreter process could not be started.
    Spawn {
        binary: String,
        source: std::io::Error,
    },
    /// The configured binary ran but does not behave like a PHP interpreter.
    Probe { binary: String, detail: String },
}

impl fmt::Display for InvokerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokerError::Spawn { binary, source } => {
                write!(f, "failed to run `{binary}`: {source}")
            }
            InvokerError::Probe { binary, detail } => {
                write!(f, "`{binary}` is not a usable PHP interpreter: {detail}")
            }
        }
    }
}

impl std::error::Error for InvokerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvokerError::Spawn { source, .. } => Some(source),
            InvokerError::Probe { .. } => None,
        }
    }
}

/// The syntax-check capability the worker pool consumes. Implementations
/// must be callable from several worker threads at once.
pub trait SyntaxChecker: Send + Sync {
    fn check(&self, file: &Path) -> Result<CheckOutcome, InvokerError>;
}

#[derive(Debug, Clone)]
/// Checks files by running `<binary> [-d error_reporting=N] [args..] -l <file>`.
pub struct PhpInterpreter {
    binary: String,
    args: Vec<String>,
    error_reporting: Option<i64>,
}

impl PhpInterpreter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
            error_reporting: None,
        }
    }

    /// Extra interpreter arguments inserted before `-l`.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Pass `-d error_reporting=<level>` to the interpreter.
    pub fn with_error_reporting(mut self, level: Option<i64>) -> Self {
        self.error_reporting = level;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run `<binary> -v` once so a misconfigured interpreter path surfaces
    /// as a single up-front error instead of one failure per file.
    pub fn probe(&self) -> Result<(), InvokerError> {
        let output = Command::new(&self.binary)
            .arg("-v")
            .output()
            .map_err(|source| InvokerError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .unwrap_or("`-v` exited with a failure status")
                .to_string();
            Err(InvokerError::Probe {
                binary: self.binary.clone(),
                detail,
            })
        }
    }
}

impl SyntaxChecker for PhpInterpreter {
    fn check(&self, file: &Path) -> Result<CheckOutcome, InvokerError> {
        let mut cmd = Command::new(&self.binary);
        if let Some(level) = self.error_reporting {
            cmd.arg("-d").arg(format!("error_reporting={level}"));
        }
        cmd.args(&self.args);
        cmd.arg("-l").arg(file);
        let output = cmd.output().map_err(|source| InvokerError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(classify_output(output.status.success(), &stdout, &stderr))
    }
}

/// Decide pass/fail from the interpreter's exit status and combined output.
///
/// Warnings, notices, and deprecations never fail a check; only recognized
/// error lines do, or a failure exit status with no recognizable line.
pub(crate) fn classify_output(exit_ok: bool, stdout: &str, stderr: &str) -> CheckOutcome {
    for line in stdout.lines().chain(stderr.lines()) {
        if let Some(error) = parse_error_line(line) {
            return CheckOutcome::Fail(error);
        }
    }
    if exit_ok {
        CheckOutcome::Pass
    } else {
        // Failure exit without a recognized error line; report what was
        // printed rather than swallowing it.
        let detail = stderr
            .lines()
            .chain(stdout.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("syntax check exited with a failure status")
            .to_string();
        CheckOutcome::Fail(LintError::syntax(detail, None))
    }
}

/// Returns the structured error when the line starts with a known error
/// keyword, either plain (`Parse error:`) or html-wrapped
/// (`<b>Parse error</b>:`).
fn parse_error_line(line: &str) -> Option<LintError> {
    let trimmed = line.trim();
    for ident in ERROR_IDENTIFIERS {
        if trimmed.starts_with(&format!("{ident}:"))
            || trimmed.starts_with(&format!("<b>{ident}</b>:"))
        {
            return Some(LintError::syntax(trimmed, line_number(trimmed)));
        }
    }
    None
}

/// Extract the `on line N` suffix PHP appends to parse errors.
fn line_number(message: &str) -> Option<u32> {
    static LINE_RE: OnceLock<Regex> = OnceLock::new();
    let re = LINE_RE.get_or_init(|| Regex::new(r"on line (\d+)").expect("valid literal regex"));
    re.captures(message)?.get(1)?.as_str().parse().ok()
}
