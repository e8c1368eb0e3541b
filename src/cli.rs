//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "phlint",
    version,
    about = "Concurrent PHP syntax checking",
    long_about = "phlint — a small, fast CLI that syntax-checks PHP files by running the interpreter's lint mode (`php -l`) across a pool of worker threads.\n\nConfiguration precedence: CLI > phlint.toml > defaults.",
    after_help = "Examples:\n  phlint check\n  phlint check --php /usr/local/bin/php --threads 8\n  phlint check --output json 'src/**/*.php'",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current phlint version."
    )]
    Version,
    /// Syntax-check PHP files with a worker pool
    #[command(
        about = "Run syntax checks",
        long_about = "Expand the configured glob patterns, run `php -l` on every matched file across the worker pool, and report all failures. Exit code is 1 when any file fails its check, 2 for configuration or interpreter problems.",
        after_help = "Examples:\n  phlint check\n  phlint check --threads 8 'src/**/*.php' 'tests/**/*.php'\n  phlint check --php php8.3 --output json"
    )]
    Check {
        #[arg(long, help = "Repository root (default: detected from current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "PHP interpreter binary (default: php)")]
        php: Option<String>,
        #[arg(long, help = "Worker thread count (default: 5)")]
        threads: Option<usize>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Value passed as -d error_reporting=<n> to PHP")]
        error_reporting: Option<i64>,
        #[arg(help = "Glob patterns relative to the repo root (default: **/*.php)")]
        patterns: Vec<String>,
    },
}
