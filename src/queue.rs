//! Shared work queue for the lint worker pool.
//!
//! Hands pending tasks to workers (each task claimed exactly once), collects
//! failures append-only, and implements the termination protocol: once
//! `terminate` is called the flag never reverts, all idle workers are woken,
//! and the caller blocks until every pending task has been claimed. Draining
//! is signaled by the `take` call that empties the queue rather than by
//! polling.

use crate::models::LintTask;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Counters across one lint run.
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total tasks submitted.
    pub submitted: AtomicUsize,

    /// Tasks a worker finished checking, pass or fail.
    pub checked: AtomicUsize,

    /// Tasks recorded as failures.
    pub failed: AtomicUsize,
}

impl QueueStats {
    pub fn submitted_count(&self) -> usize {
        self.submitted.load(Ordering::Relaxed)
    }

    pub fn checked_count(&self) -> usize {
        self.checked.load(Ordering::Relaxed)
    }

    pub fn failed_count(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Pending tasks and the termination flag share one lock so a worker's
/// empty-then-terminated check is a single consistent view.
struct State {
    pending: VecDeque<LintTask>,
    terminated: bool,
}

/// Thread-safe hand-off of lint work, created fresh for every run.
pub struct LintQueue {
    state: Mutex<State>,
    work: Condvar,
    drained: Condvar,
    failures: Mutex<Vec<LintTask>>,
    stats: QueueStats,
}

impl Default for LintQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl LintQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                pending: VecDeque::new(),
                terminated: false,
            }),
            work: Condvar::new(),
            drained: Condvar::new(),
            failures: Mutex::new(Vec::new()),
            stats: QueueStats::default(),
        }
    }

    /// Append a task and wake one idle worker. Callable from any thread,
    /// before or while workers are running.
    pub fn submit(&self, task: LintTask) {
        let mut state = self.state.lock();
        state.pending.push_back(task);
        self.stats.submitted.fetch_add(1, Ordering::Relaxed);
        self.work.notify_one();
    }

    /// Claim the next pending task without blocking. The mutex makes the
    /// claim atomic: no task is ever returned to two callers.
    pub fn take(&self) -> Option<LintTask> {
        let mut state = self.state.lock();
        let task = state.pending.pop_front();
        if task.is_some() && state.pending.is_empty() {
            // This claim emptied the queue; release anyone blocked in
            // terminate().
            self.drained.notify_all();
        }
        task
    }

    /// Park an idle worker until new work arrives, the timeout elapses, or
    /// termination is signaled. Returns immediately when there is already
    /// work or the queue is terminated. Spurious wakes are fine; callers
    /// re-check their loop condition.
    pub fn wait_for_work(&self, timeout: Duration) {
        let mut state = self.state.lock();
        if state.pending.is_empty() && !state.terminated {
            let _ = self.work.wait_for(&mut state, timeout);
        }
    }

    /// Record a failed task. Append-only; entries are never mutated or
    /// removed afterwards.
    pub fn record_failure(&self, task: LintTask) {
        self.failures.lock().push(task);
        self.stats.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a finished check, pass or fail.
    pub fn record_checked(&self) {
        self.stats.checked.fetch_add(1, Ordering::Relaxed);
    }

    /// Set the terminated flag (monotonic: it never reverts), wake every
    /// waiter, and block until all pending tasks have been claimed.
    ///
    /// Returning only guarantees tasks were *claimed*; a worker can still be
    /// mid-check on the last one. The runner joins all workers before
    /// reading failures, which closes that gap.
    pub fn terminate(&self) {
        let mut state = self.state.lock();
        state.terminated = true;
        self.work.notify_all();
        while !state.pending.is_empty() {
            self.drained.wait(&mut state);
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.state.lock().terminated
    }

    pub fn pending_is_empty(&self) -> bool {
        self.state.lock().pending.is_empty()
    }

    /// Move the accumulated failures out. Meaningful once the workers have
    /// been joined.
    pub fn take_failures(&self) -> Vec<LintTask> {
        std::mem::take(&mut *self.failures.lock())
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    fn task(name: &str) -> LintTask {
        LintTask::new(PathBuf::from(name))
    }

    #[test]
    fn test_take_is_fifo_for_single_consumer() {
        let queue = LintQueue::new();
        queue.submit(task("a.php"));
        queue.submit(task("b.php"));

        assert_eq!(queue.take().unwrap().file().to_str(), Some("a.php"));
        assert_eq!(queue.take().unwrap().file().to_str(), Some("b.php"));
        assert!(queue.take().is_none());
    }

    #[test]
    fn test_take_on_empty_returns_none_without_blocking() {
        let queue = LintQueue::new();
        assert!(queue.take().is_none());
        assert!(queue.pending_is_empty());
    }

    #[test]
    fn test_terminate_on_empty_queue_returns_immediately() {
        let queue = LintQueue::new();
        assert!(!queue.is_terminated());
        queue.terminate();
        assert!(queue.is_terminated());
        // Monotonic: a second call is a no-op.
        queue.terminate();
        assert!(queue.is_terminated());
    }

    #[test]
    fn test_terminate_blocks_until_pending_claimed() {
        let queue = Arc::new(LintQueue::new());
        for i in 0..3 {
            queue.submit(task(&format!("f{i}.php")));
        }

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut claimed = 0;
                loop {
                    match queue.take() {
                        Some(_) => {
                            claimed += 1;
                            thread::sleep(Duration::from_millis(10));
                        }
                        None if queue.is_terminated() => break,
                        None => queue.wait_for_work(Duration::from_millis(10)),
                    }
                }
                claimed
            })
        };

        queue.terminate();
        assert!(queue.pending_is_empty());
        assert_eq!(consumer.join().unwrap(), 3);
    }

    #[test]
    fn test_wait_for_work_times_out_on_idle_queue() {
        let queue = LintQueue::new();
        let started = Instant::now();
        queue.wait_for_work(Duration::from_millis(50));
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_wait_for_work_returns_early_when_terminated() {
        let queue = LintQueue::new();
        queue.terminate();
        let started = Instant::now();
        queue.wait_for_work(Duration::from_secs(5));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_terminate_wakes_all_parked_waiters() {
        let queue = Arc::new(LintQueue::new());
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let started = Instant::now();
                    queue.wait_for_work(Duration::from_secs(5));
                    started.elapsed()
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        queue.terminate();
        for waiter in waiters {
            assert!(waiter.join().unwrap() < Duration::from_secs(2));
        }
    }

    #[test]
    fn test_failures_and_stats_accumulate() {
        let queue = LintQueue::new();
        queue.submit(task("a.php"));
        queue.submit(task("b.php"));
        let a = queue.take().unwrap();
        let _b = queue.take().unwrap();
        queue.record_checked();
        queue.record_checked();
        queue.record_failure(a);

        assert_eq!(queue.stats().submitted_count(), 2);
        assert_eq!(queue.stats().checked_count(), 2);
        assert_eq!(queue.stats().failed_count(), 1);
        assert_eq!(queue.take_failures().len(), 1);
    }
}
