//! phlint CLI binary entry point.
//! Resolves configuration, probes the interpreter, runs the check pass,
//! and maps results to exit codes.

mod cli;
mod config;
mod invoker;
mod lint;
mod models;
mod output;
mod queue;
mod runner;
mod utils;
mod worker;

use clap::Parser;
use cli::{Cli, Commands};
use std::sync::Arc;

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Check {
            repo_root,
            php,
            threads,
            output,
            error_reporting,
            patterns,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                php.as_deref(),
                threads,
                output.as_deref(),
                error_reporting,
                &patterns,
            );
            // Friendly note if no phlint config was found
            if config::load_config(&eff.repo_root).is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No phlint.toml found; using defaults."
                );
            }
            // Fail fast on an unusable interpreter instead of recording the
            // same invoker failure once per file.
            let interpreter = lint::php_interpreter(&eff);
            if let Err(e) = interpreter.probe() {
                eprintln!("{} {}", utils::error_prefix(), e);
                std::process::exit(2);
            }
            if eff.output != "json" {
                eprintln!(
                    "{} {}",
                    utils::info_prefix(),
                    format!(
                        "Checking [{}] with {} workers",
                        eff.patterns.join(", "),
                        eff.threads
                    )
                );
            }
            match lint::run_lint_with_checker(&eff, Arc::new(interpreter)) {
                Ok((report, errors)) => {
                    output::print_lint(&report, &eff.output, &errors);
                    if report.summary.failures > 0 {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            }
        }
    }
}
