use anyhow::Result;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::cancel::CancelToken;
use crate::engine::executor::FileTaskExecutor;
use crate::engine::tools::check_root_and_canonicalize;
use crate::pipeline::pool::{HandleState, TaskHandle, TaskRunner, WorkerPool};
use crate::pipeline::{WalkContext, report_skipped_dirs, walk};
use crate::utils::config::WAIT_POLL_INTERVAL;
use crate::{Opts, RunResult, TaskStatus};

/// How waiting on the submitted handles ended.
#[derive(Debug, PartialEq, Eq)]
enum WaitEnd {
    AllDone,
    Cancelled,
    TimedOut,
}

/// Run Coordinator: validate, walk, wait for every submitted task, then shut the pool down
/// gracefully, or immediately when cancellation was observed.
///
/// Fatal only for invalid options and an unreadable root. Task failures are counted, not returned.
pub fn run(root: &Path, opts: &Opts, cancel: &CancelToken) -> Result<RunResult> {
    let executor = Arc::new(FileTaskExecutor::new(cancel.clone()));
    run_with_runner(root, opts, cancel, executor)
}

/// [`run`] with a caller-provided task runner in place of the file executor.
pub fn run_with_runner<R: TaskRunner>(
    root: &Path,
    opts: &Opts,
    cancel: &CancelToken,
    runner: Arc<R>,
) -> Result<RunResult> {
    let operation = opts.validate()?.clone();
    let root = check_root_and_canonicalize(root)?;
    let ctx = WalkContext::new(&root, opts, operation);
    debug!(
        "Run: {} in {} ({})",
        ctx.operation,
        root.display(),
        if ctx.recursive { "recursive" } else { "top level only" }
    );

    let pool = WorkerPool::new(opts.worker_count(), runner);
    debug!("Worker pool size: {}", pool.size());

    let report = walk(&ctx, &pool, cancel);
    report_skipped_dirs(opts, &report.skipped_dirs);

    let mut result = RunResult {
        tasks_submitted: report.handles.len(),
        skipped_dirs: report.skipped_dirs.len(),
        ..Default::default()
    };

    let deadline = Instant::now() + opts.shutdown_timeout;
    let (mut end, pending) = await_handles(report.handles, cancel, deadline, &mut result);
    debug!("Wait ended: {:?}, {} handle(s) pending", end, pending.len());
    if end == WaitEnd::AllDone && cancel.is_cancelled() {
        end = WaitEnd::Cancelled;
    }

    match end {
        WaitEnd::Cancelled => {
            let shutdown = pool.shutdown_now();
            debug!("Discarded {} queued task(s)", shutdown.discarded);
            // Workers are joined: every pending handle is now resolved one way or the other.
            for handle in &pending {
                tally(handle.wait().map(HandleState::Finished), &mut result);
            }
        }
        WaitEnd::AllDone => {
            // Every task has resolved, so the workers are idle and exit at once.
            pool.shutdown(opts.shutdown_timeout);
        }
        WaitEnd::TimedOut => {
            let shutdown = pool.shutdown(std::time::Duration::ZERO);
            for handle in &pending {
                match handle.poll() {
                    HandleState::Pending => {
                        info!("Abandoned (shutdown timeout): {}", handle.path().display());
                        result.tasks_discarded += 1;
                    }
                    state => tally(Some(state), &mut result),
                }
            }
            warn!(
                "Gave up waiting after {:?}; {} worker(s) still busy",
                opts.shutdown_timeout, shutdown.abandoned_workers
            );
        }
    }

    result.cancelled = report.cancelled || cancel.is_cancelled();
    debug!("{:?}", result);
    Ok(result)
}

/// Wait on handles in submission order, polling the cancellation flag between waits.
/// Returns how the wait ended and the handles not yet resolved.
fn await_handles(
    handles: Vec<TaskHandle>,
    cancel: &CancelToken,
    deadline: Instant,
    result: &mut RunResult,
) -> (WaitEnd, Vec<TaskHandle>) {
    let mut handles = handles.into_iter();
    while let Some(handle) = handles.next() {
        loop {
            if cancel.is_cancelled() {
                let mut pending = vec![handle];
                pending.extend(handles);
                return (WaitEnd::Cancelled, pending);
            }
            let now = Instant::now();
            if now >= deadline {
                let mut pending = vec![handle];
                pending.extend(handles);
                return (WaitEnd::TimedOut, pending);
            }
            match handle.wait_timeout(WAIT_POLL_INTERVAL.min(deadline - now)) {
                HandleState::Pending => continue,
                state => {
                    tally(Some(state), result);
                    break;
                }
            }
        }
    }
    (WaitEnd::AllDone, Vec::new())
}

/// Count one resolved handle. `None` or NotRun means the task never ran.
fn tally(state: Option<HandleState>, result: &mut RunResult) {
    match state {
        Some(HandleState::Finished(outcome)) => {
            result.tasks_completed += 1;
            if let TaskStatus::Failed(_) = outcome.status {
                result.tasks_failed += 1;
            }
        }
        Some(HandleState::NotRun) | None => result.tasks_discarded += 1,
        Some(HandleState::Pending) => {}
    }
}
