//! Output rendering for the check command.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-failure fields, the walk errors, and a top-level summary.

use crate::models::{ErrorKind, LintReport};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print lint results in the requested format.
pub fn print_lint(report: &LintReport, output: &str, errors: &[String]) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_lint_json(report, errors)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            for failure in &report.failures {
                let tag = match failure.kind {
                    ErrorKind::Syntax => {
                        if color {
                            "⟦syntax⟧".red().bold().to_string()
                        } else {
                            "⟦syntax⟧".to_string()
                        }
                    }
                    ErrorKind::Invoker => {
                        if color {
                            "⟦invoker⟧".yellow().bold().to_string()
                        } else {
                            "⟦invoker⟧".to_string()
                        }
                    }
                };
                let icon = if color {
                    "✖".red().to_string()
                } else {
                    "✖".to_string()
                };
                let file = if color {
                    failure.file.clone().bold().to_string()
                } else {
                    failure.file.clone()
                };
                let loc = failure
                    .line
                    .map(|l| format!(":{l}"))
                    .unwrap_or_default();
                println!("{} {} {}{} — {}", icon, tag, file, loc, failure.message);
            }
            for err in errors {
                eprintln!("{} {}", crate::utils::note_prefix(), err);
            }
            let summary = format!(
                "— Summary — checked={} failures={} duration={}ms",
                report.summary.checked, report.summary.failures, report.summary.duration_ms
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

fn compose_lint_json(report: &LintReport, errors: &[String]) -> JsonVal {
    json!({
        "failures": report.failures,
        "summary": report.summary,
        "errors": errors,
    })
}
