//! phlint core library.
//!
//! This crate exposes programmatic APIs for concurrently syntax-checking
//! PHP files via the interpreter's lint mode (`php -l`).
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `invoker`: PHP interpreter invocation and output classification.
//! - `queue`: Thread-safe work hand-off with the termination protocol.
//! - `worker`: Worker loop claiming tasks until terminated and drained.
//! - `runner`: Pool orchestration: submit files, run, collect failures.
//! - `lint`: Pattern expansion and report assembly.
//! - `models`: Data models for tasks, failures, and report structs.
//! - `output`: Human/JSON printers for check results.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod invoker;
pub mod lint;
pub mod models;
pub mod output;
pub mod queue;
pub mod runner;
pub mod utils;
pub mod worker;
