//! Orchestrates one lint pass: owns the queue and the fixed worker pool.
//!
//! `run` is synchronous from the caller's view. It returns only after the
//! queue has drained *and* every worker thread has been joined, so no
//! in-flight check can be missing from the failure list when it is read.

use crate::invoker::SyntaxChecker;
use crate::models::{LintFailure, LintTask};
use crate::queue::LintQueue;
use crate::worker::LintWorker;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Worker count used when none is configured, matching the interpreter
/// call's external-process nature: more workers, more overlap.
pub const DEFAULT_THREADS: usize = 5;

#[derive(Debug)]
/// The pool itself could not be brought up. The only error `run` surfaces;
/// individual file failures are collected, never thrown.
pub struct RunError {
    source: io::Error,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to start lint worker pool: {}", self.source)
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Coordinator for a single lint pass. The queue is created fresh per
/// runner and discarded with it; runners are not reused across passes.
pub struct LintRunner {
    queue: Arc<LintQueue>,
    checker: Arc<dyn SyntaxChecker>,
    threads: usize,
}

impl LintRunner {
    pub fn new(checker: Arc<dyn SyntaxChecker>, threads: usize) -> Self {
        Self {
            queue: Arc::new(LintQueue::new()),
            checker,
            threads: threads.max(1),
        }
    }

    /// Queue one file for checking. May be called before or interleaved
    /// with `run`, from any thread.
    pub fn add_file(&self, file: PathBuf) {
        self.queue.submit(LintTask::new(file));
    }

    /// Run the pass to completion and return every failure.
    ///
    /// Starts all workers, terminates the queue (blocking until every
    /// pending task is claimed), then joins each worker so checks still in
    /// flight finish before failures are collected. The failure list
    /// carries no ordering guarantee.
    pub fn run(&self) -> Result<Vec<LintFailure>, RunError> {
        let mut handles = Vec::with_capacity(self.threads);
        for index in 0..self.threads {
            let worker = LintWorker::new(Arc::clone(&self.queue), Arc::clone(&self.checker));
            match worker.spawn(index) {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    // Claim whatever is still pending so terminate() cannot
                    // block forever with too few workers, then wind down the
                    // ones that did start.
                    while self.queue.take().is_some() {}
                    self.queue.terminate();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(RunError { source });
                }
            }
        }

        self.queue.terminate();
        for handle in handles {
            // A panicked worker has nothing more to contribute; keep
            // joining the rest so the pass still completes.
            let _ = handle.join();
        }

        Ok(self
            .queue
            .take_failures()
            .into_iter()
            .filter_map(LintTask::into_failure)
            .collect())
    }

    /// Number of files a worker finished checking, pass or fail.
    pub fn checked_count(&self) -> usize {
        self.queue.stats().checked_count()
    }
}
