//! Configuration discovery and effective settings resolution.
//!
//! phlint reads `phlint.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `threads`: 5
//! - `output`: `human`
//! - `patterns`: `["**/*.php"]`
//! - `php.binary`: `php`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::runner::DEFAULT_THREADS;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Interpreter-related configuration section under `[php]`.
pub struct PhpCfg {
    pub binary: Option<String>,
    /// Extra interpreter arguments inserted before `-l`.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(rename = "errorReporting")]
    pub error_reporting: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `phlint.toml|yaml`.
pub struct PhlintConfig {
    pub threads: Option<usize>,
    pub output: Option<String>,
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
    pub php: Option<PhpCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub threads: usize,
    pub output: String,
    pub patterns: Vec<String>,
    pub php_binary: String,
    pub php_args: Vec<String>,
    pub error_reporting: Option<i64>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `phlint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("phlint.toml").exists()
            || cur.join("phlint.yaml").exists()
            || cur.join("phlint.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(parent) => cur = parent,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `phlint.toml` (preferred) or `phlint.yaml|yml` from `root`.
pub fn load_config(root: &Path) -> Option<PhlintConfig> {
    if let Ok(s) = fs::read_to_string(root.join("phlint.toml")) {
        return toml::from_str(&s).ok();
    }
    for name in ["phlint.yaml", "phlint.yml"] {
        if let Ok(s) = fs::read_to_string(root.join(name)) {
            return serde_yaml::from_str(&s).ok();
        }
    }
    None
}

/// Merge CLI flags over the config file over defaults.
///
/// An explicit `repo_root` is taken as-is; otherwise the root is detected
/// upward from the current directory.
pub fn resolve_effective(
    repo_root: Option<&str>,
    php: Option<&str>,
    threads: Option<usize>,
    output: Option<&str>,
    error_reporting: Option<i64>,
    patterns: &[String],
) -> Effective {
    let root = match repo_root {
        Some(r) => PathBuf::from(r),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            detect_repo_root(&cwd)
        }
    };
    let cfg = load_config(&root).unwrap_or_default();
    let php_cfg = cfg.php.unwrap_or_default();

    Effective {
        repo_root: root,
        threads: threads.or(cfg.threads).unwrap_or(DEFAULT_THREADS).max(1),
        output: output
            .map(str::to_string)
            .or(cfg.output)
            .unwrap_or_else(|| "human".to_string()),
        patterns: if patterns.is_empty() {
            cfg.patterns
                .unwrap_or_else(|| vec!["**/*.php".to_string()])
        } else {
            patterns.to_vec()
        },
        php_binary: php
            .map(str::to_string)
            .or(php_cfg.binary)
            .unwrap_or_else(|| "php".to_string()),
        php_args: php_cfg.args,
        error_reporting: error_reporting.or(php_cfg.error_reporting),
    }
}
