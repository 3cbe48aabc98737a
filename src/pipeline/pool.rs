//! Fixed-size worker pool fed by an unbounded task queue.
//!
//! Each submission returns a [`TaskHandle`] backed by a one-shot reply channel. A worker sends the
//! outcome on it when the task ran; dropping the reply sender without sending (task discarded,
//! preempted by cancellation, or never picked up) tells the handle the task did not run.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded, unbounded};
use log::{debug, error, warn};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::{Task, TaskOutcome};

/// Runs one task. `None` means the task did not run (e.g. cancellation was observed first).
pub trait TaskRunner: Send + Sync + 'static {
    fn run(&self, task: &Task) -> Option<TaskOutcome>;
}

struct Job {
    task: Task,
    reply: Sender<TaskOutcome>,
}

/// State of a submitted task as seen through its handle.
#[derive(Debug)]
pub enum HandleState {
    /// Ran to a terminal outcome.
    Finished(TaskOutcome),
    /// Will never run: discarded, preempted, or its worker is gone.
    NotRun,
    /// Still queued or in flight.
    Pending,
}

/// Awaitable handle for one submitted task.
pub struct TaskHandle {
    path: PathBuf,
    outcome_rx: Receiver<TaskOutcome>,
}

impl TaskHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the task finishes or is known not to run.
    pub fn wait(&self) -> Option<TaskOutcome> {
        self.outcome_rx.recv().ok()
    }

    /// Wait at most `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> HandleState {
        match self.outcome_rx.recv_timeout(timeout) {
            Ok(outcome) => HandleState::Finished(outcome),
            Err(RecvTimeoutError::Disconnected) => HandleState::NotRun,
            Err(RecvTimeoutError::Timeout) => HandleState::Pending,
        }
    }

    /// Non-blocking check.
    pub fn poll(&self) -> HandleState {
        match self.outcome_rx.try_recv() {
            Ok(outcome) => HandleState::Finished(outcome),
            Err(TryRecvError::Disconnected) => HandleState::NotRun,
            Err(TryRecvError::Empty) => HandleState::Pending,
        }
    }
}

/// What a shutdown left behind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Queued tasks dropped without running.
    pub discarded: usize,
    /// Workers still busy when a graceful shutdown hit its deadline (left detached).
    pub abandoned_workers: usize,
}

/// Fixed set of worker threads consuming a shared queue. Size never changes after [`WorkerPool::new`].
///
/// Shutdown consumes the pool, so nothing can be submitted afterwards.
pub struct WorkerPool {
    job_tx: Sender<Job>,
    job_rx: Receiver<Job>,
    done_rx: Receiver<()>,
    workers: Vec<JoinHandle<()>>,
}

/// Single worker: pull jobs until the queue is closed and empty. A panicking task becomes a
/// failed outcome; the worker keeps going.
fn worker_loop<R: TaskRunner>(job_rx: Receiver<Job>, runner: Arc<R>, _done_tx: Sender<()>) {
    while let Ok(Job { task, reply }) = job_rx.recv() {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| runner.run(&task))) {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Task panicked: {}", task.path.display());
                Some(TaskOutcome::failed(&task.path, "task panicked"))
            }
        };
        if let Some(outcome) = outcome {
            let _ = reply.send(outcome);
        }
    }
    // _done_tx drops here; the pool sees disconnection once every worker has exited.
}

impl WorkerPool {
    /// Spawn `size` workers (at least one), each running tasks through `runner`.
    pub fn new<R: TaskRunner>(size: usize, runner: Arc<R>) -> Self {
        let (job_tx, job_rx) = unbounded::<Job>();
        let (done_tx, done_rx) = bounded::<()>(0);
        let workers = (0..size.max(1))
            .map(|_| {
                let job_rx = job_rx.clone();
                let runner = Arc::clone(&runner);
                let done_tx = done_tx.clone();
                thread::spawn(move || worker_loop(job_rx, runner, done_tx))
            })
            .collect();
        WorkerPool {
            job_tx,
            job_rx,
            done_rx,
            workers,
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Tasks queued and not yet picked up by a worker.
    pub fn queued(&self) -> usize {
        self.job_rx.len()
    }

    /// Queue `task`. Never blocks.
    pub fn submit(&self, task: Task) -> TaskHandle {
        let (reply, outcome_rx) = bounded(1);
        let path = task.path.clone();
        // The pool holds a receiver, so send cannot fail; if it did, the dropped reply reads as NotRun.
        let _ = self.job_tx.send(Job { task, reply });
        TaskHandle { path, outcome_rx }
    }

    /// Graceful: stop accepting work and let queued and in-flight tasks finish, waiting at most
    /// `timeout`. Past the deadline, still-queued tasks are discarded and busy workers are detached.
    pub fn shutdown(self, timeout: Duration) -> ShutdownReport {
        let WorkerPool {
            job_tx,
            job_rx,
            done_rx,
            workers,
        } = self;
        drop(job_tx);
        let deadline = Instant::now() + timeout;
        match done_rx.recv_deadline(deadline) {
            Err(RecvTimeoutError::Disconnected) | Ok(()) => {
                join_workers(workers);
                ShutdownReport::default()
            }
            Err(RecvTimeoutError::Timeout) => {
                let discarded = job_rx.try_iter().count();
                let abandoned_workers = workers.iter().filter(|w| !w.is_finished()).count();
                warn!(
                    "Shutdown timed out after {:?}: abandoning {} queued task(s), {} busy worker(s)",
                    timeout, discarded, abandoned_workers
                );
                ShutdownReport {
                    discarded,
                    abandoned_workers,
                }
            }
        }
    }

    /// Immediate: stop accepting work and discard queued tasks. Tasks already running finish;
    /// this waits for them.
    pub fn shutdown_now(self) -> ShutdownReport {
        let WorkerPool {
            job_tx,
            job_rx,
            done_rx: _,
            workers,
        } = self;
        drop(job_tx);
        let discarded = job_rx.try_iter().count();
        debug!("Immediate shutdown: discarded {} queued task(s)", discarded);
        join_workers(workers);
        ShutdownReport {
            discarded,
            abandoned_workers: 0,
        }
    }
}

fn join_workers(workers: Vec<JoinHandle<()>>) {
    for h in workers {
        let _ = h.join();
    }
}
