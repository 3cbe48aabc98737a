//! Walk context: everything the walker needs to classify entries and build tasks.

use std::path::{Path, PathBuf};

use crate::engine::tools::resolve_dir;
use crate::pipeline::pool::TaskHandle;
use crate::{Operation, Opts, Task};

/// Shared, read-only context for one walk. Built by the coordinator from validated [`Opts`].
#[derive(Clone, Debug)]
pub struct WalkContext {
    pub root: PathBuf,
    pub recursive: bool,
    pub follow_links: bool,
    pub exclude: Vec<String>,
    /// Never descended into: the copy destination, so fresh copies are not picked up again.
    pub excluded_dir: Option<PathBuf>,
    pub operation: Operation,
    pub dry_run: bool,
}

impl WalkContext {
    /// `root` should already be canonical (see `check_root_and_canonicalize`).
    pub fn new(root: &Path, opts: &Opts, operation: Operation) -> Self {
        let excluded_dir = match &operation {
            Operation::Copy { dest } => Some(resolve_dir(dest)),
            _ => None,
        };
        WalkContext {
            root: root.to_path_buf(),
            recursive: opts.recursive,
            follow_links: opts.follow_links,
            exclude: opts.exclude.clone(),
            excluded_dir,
            operation,
            dry_run: opts.dry_run,
        }
    }

    /// Task for one discovered image.
    pub fn task_for(&self, path: PathBuf) -> Task {
        Task {
            path,
            operation: self.operation.clone(),
            dry_run: self.dry_run,
        }
    }
}

/// Result of a walk: handles for every submitted task plus directories that could not be listed.
#[derive(Default)]
pub struct WalkReport {
    pub handles: Vec<TaskHandle>,
    pub skipped_dirs: Vec<(PathBuf, String)>,
    /// The walk stopped early because cancellation was observed.
    pub cancelled: bool,
}
