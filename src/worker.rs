//! Worker loop: claims tasks from the shared queue and runs the syntax
//! checker until the queue is terminated and fully drained.

use crate::invoker::{CheckOutcome, SyntaxChecker};
use crate::models::{LintError, LintTask};
use crate::queue::LintQueue;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long an idle worker parks before re-checking the queue.
const IDLE_WAIT: Duration = Duration::from_millis(50);

/// One member of the fixed worker pool. Each worker shares the queue and
/// the checker; nothing else is shared between workers.
pub struct LintWorker {
    queue: Arc<LintQueue>,
    checker: Arc<dyn SyntaxChecker>,
}

impl LintWorker {
    pub fn new(queue: Arc<LintQueue>, checker: Arc<dyn SyntaxChecker>) -> Self {
        Self { queue, checker }
    }

    /// Spawn the worker on a named OS thread.
    pub fn spawn(self, index: usize) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("lint-worker-{index}"))
            .spawn(move || self.run())
    }

    /// Claim and process tasks until the queue is terminated *and* empty.
    ///
    /// The claim attempt comes before the terminated check so a worker never
    /// exits while pending tasks remain; termination only takes effect once
    /// `take` comes up empty.
    fn run(self) {
        loop {
            match self.queue.take() {
                Some(task) => self.process(task),
                None => {
                    if self.queue.is_terminated() {
                        break;
                    }
                    self.queue.wait_for_work(IDLE_WAIT);
                }
            }
        }
    }

    /// Run the checker on one claimed task and record the outcome. An
    /// infrastructure error while invoking the checker is recorded as a
    /// failure for that file; it never takes the worker down.
    fn process(&self, mut task: LintTask) {
        let outcome = self.checker.check(task.file());
        self.queue.record_checked();
        match outcome {
            Ok(CheckOutcome::Pass) => {}
            Ok(CheckOutcome::Fail(error)) => {
                task.set_error(error);
                self.queue.record_failure(task);
            }
            Err(infra) => {
                task.set_error(LintError::invoker(infra.to_string()));
                self.queue.record_failure(task);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::InvokerError;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingChecker {
        calls: AtomicUsize,
        fail_suffix: &'static str,
    }

    impl SyntaxChecker for CountingChecker {
        fn check(&self, file: &Path) -> Result<CheckOutcome, InvokerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if file.to_string_lossy().ends_with(self.fail_suffix) {
                Ok(CheckOutcome::Fail(LintError::syntax(
                    "Parse error: unexpected token",
                    Some(1),
                )))
            } else {
                Ok(CheckOutcome::Pass)
            }
        }
    }

    #[test]
    fn test_worker_drains_queue_then_exits_on_terminate() {
        let queue = Arc::new(LintQueue::new());
        let checker = Arc::new(CountingChecker {
            calls: AtomicUsize::new(0),
            fail_suffix: "bad.php",
        });

        queue.submit(LintTask::new(PathBuf::from("ok.php")));
        let worker_checker: Arc<dyn SyntaxChecker> = checker.clone();
        let handle = LintWorker::new(Arc::clone(&queue), worker_checker)
            .spawn(0)
            .unwrap();

        // Interleaved submission while the worker is already running.
        queue.submit(LintTask::new(PathBuf::from("bad.php")));
        queue.terminate();
        handle.join().unwrap();

        assert_eq!(checker.calls.load(Ordering::SeqCst), 2);
        assert_eq!(queue.stats().checked_count(), 2);
        assert_eq!(queue.take_failures().len(), 1);
    }

    #[test]
    fn test_idle_worker_exits_promptly_after_terminate() {
        let queue = Arc::new(LintQueue::new());
        let checker = Arc::new(CountingChecker {
            calls: AtomicUsize::new(0),
            fail_suffix: ".none",
        });
        let handle = LintWorker::new(Arc::clone(&queue), checker).spawn(0).unwrap();

        std::thread::sleep(Duration::from_millis(20));
        queue.terminate();
        handle.join().unwrap();
        assert_eq!(queue.stats().checked_count(), 0);
    }
}
