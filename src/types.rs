//! Public and internal types for the imgbatch API and pipeline.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ArgumentError;
use crate::utils::config::{GRACEFUL_SHUTDOWN_TIMEOUT, WorkerThreadLimits};

/// What a run does to every discovered image. Exactly one per run.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Resize by `factor` and overwrite in place.
    Scale { factor: f64 },
    /// Invert RGB channels (alpha untouched) and overwrite in place.
    Negative,
    /// Delete the file.
    Remove,
    /// Copy the file into `dest`, creating it if needed and overwriting same-named files.
    Copy { dest: PathBuf },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Scale { .. } => "scale",
            Operation::Negative => "negative",
            Operation::Remove => "remove",
            Operation::Copy { .. } => "copy",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Scale { factor } => write!(f, "scale x{factor}"),
            Operation::Copy { dest } => write!(f, "copy -> {}", dest.display()),
            other => f.write_str(other.name()),
        }
    }
}

/// Run configuration (CLI, `.imgbatch.toml`, or lib caller). Immutable once the run starts.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Operation to apply. `None` is rejected by [`Opts::validate`].
    pub operation: Option<Operation>,
    /// Descend into sub-directories.
    pub recursive: bool,
    /// Override worker thread count. When None, one worker per available hardware thread.
    pub num_threads: Option<usize>,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// Exclude patterns (glob syntax, matched against file and directory names).
    pub exclude: Vec<String>,
    /// Debug-level logging and per-directory skip listing.
    pub verbose: bool,
    /// Log what each task would do; touch nothing.
    pub dry_run: bool,
    /// Upper bound on the graceful wait for queued and in-flight tasks.
    pub shutdown_timeout: Duration,
}

impl Default for Opts {
    fn default() -> Self {
        Opts {
            operation: None,
            recursive: false,
            num_threads: None,
            follow_links: false,
            exclude: Vec::new(),
            verbose: false,
            dry_run: false,
            shutdown_timeout: GRACEFUL_SHUTDOWN_TIMEOUT,
        }
    }
}

impl Opts {
    /// Reject invalid combinations before anything is submitted. Returns the operation on success.
    pub fn validate(&self) -> Result<&Operation, ArgumentError> {
        let op = self.operation.as_ref().ok_or(ArgumentError::MissingOperation)?;
        match op {
            Operation::Scale { factor } if !factor.is_finite() || *factor <= 0.0 => {
                return Err(ArgumentError::InvalidScaleFactor(*factor));
            }
            Operation::Copy { dest } if dest.as_os_str().is_empty() => {
                return Err(ArgumentError::MissingDestination);
            }
            _ => {}
        }
        if self.num_threads == Some(0) {
            return Err(ArgumentError::ZeroWorkers);
        }
        Ok(op)
    }

    /// Worker count for this run: the override, or available hardware parallelism.
    pub fn worker_count(&self) -> usize {
        self.num_threads
            .unwrap_or_else(|| WorkerThreadLimits::current().all_threads)
            .max(1)
    }
}

/// One unit of work: one file, one operation. Owned by the worker that runs it.
#[derive(Clone, Debug)]
pub struct Task {
    pub path: PathBuf,
    pub operation: Operation,
    pub dry_run: bool,
}

impl Task {
    pub fn new(path: impl Into<PathBuf>, operation: Operation) -> Self {
        Task {
            path: path.into(),
            operation,
            dry_run: false,
        }
    }
}

/// Terminal state of a task that actually ran.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskStatus {
    Succeeded,
    /// Undecodable image content (DecodeSkip). Not an error; file untouched.
    Skipped,
    /// Reported failure with its message.
    Failed(String),
}

/// Outcome of one task, consumed by the coordinator for synchronization.
#[derive(Clone, Debug)]
pub struct TaskOutcome {
    pub path: PathBuf,
    pub status: TaskStatus,
}

impl TaskOutcome {
    pub fn succeeded(path: &Path) -> Self {
        Self::with_status(path, TaskStatus::Succeeded)
    }

    pub fn skipped(path: &Path) -> Self {
        Self::with_status(path, TaskStatus::Skipped)
    }

    pub fn failed(path: &Path, msg: impl Into<String>) -> Self {
        Self::with_status(path, TaskStatus::Failed(msg.into()))
    }

    fn with_status(path: &Path, status: TaskStatus) -> Self {
        TaskOutcome {
            path: path.to_path_buf(),
            status,
        }
    }

    /// True unless the task failed. A DecodeSkip counts as success.
    pub fn is_success(&self) -> bool {
        !matches!(self.status, TaskStatus::Failed(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            TaskStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Summary of a run. Not persisted; returned by [`process_dir`](crate::process_dir).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Tasks handed to the worker pool.
    pub tasks_submitted: usize,
    /// Tasks that reached a terminal outcome (success, DecodeSkip, or failure).
    pub tasks_completed: usize,
    /// Subset of `tasks_completed` that failed.
    pub tasks_failed: usize,
    /// Tasks never run: discarded by immediate shutdown, preempted, or abandoned at the timeout.
    pub tasks_discarded: usize,
    /// Directories that could not be enumerated.
    pub skipped_dirs: usize,
    /// Cancellation was observed during the run.
    pub cancelled: bool,
}
