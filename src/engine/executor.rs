//! File Task Executor: runs one task against the filesystem and turns every failure into an outcome.

use log::{debug, info, warn};
use std::fs;
use std::path::Path;

use crate::cancel::CancelToken;
use crate::engine::codec::{decode, encode};
use crate::engine::tools::{copy_target, format_for_path};
use crate::engine::transform::{negate, scale};
use crate::error::TaskError;
use crate::pipeline::pool::TaskRunner;
use crate::utils::tempfiles::replace_via_temp;
use crate::{Operation, Task, TaskOutcome};

/// What a task did when it did not fail.
#[derive(Debug, PartialEq, Eq)]
enum Applied {
    Done,
    /// Undecodable image content; nothing written.
    DecodeSkip,
}

/// Executes [`Task`]s. Checks the cancellation token once, before any work.
#[derive(Clone, Debug)]
pub struct FileTaskExecutor {
    cancel: CancelToken,
}

impl FileTaskExecutor {
    pub fn new(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    /// Run `task` to a single terminal outcome. Returns None when cancellation was already set
    /// (the task never started and counts as not completed).
    pub fn execute(&self, task: &Task) -> Option<TaskOutcome> {
        if self.cancel.is_cancelled() {
            debug!("Not started (cancelled): {}", task.path.display());
            return None;
        }
        if task.dry_run {
            info!("Would {}: {}", task.operation, task.path.display());
            return Some(TaskOutcome::succeeded(&task.path));
        }
        let outcome = match apply(task) {
            Ok(Applied::Done) => TaskOutcome::succeeded(&task.path),
            Ok(Applied::DecodeSkip) => {
                info!("Skipped (not a decodable image): {}", task.path.display());
                TaskOutcome::skipped(&task.path)
            }
            Err(e) => {
                warn!("Error processing file {}: {}", task.path.display(), e);
                TaskOutcome::failed(&task.path, e.to_string())
            }
        };
        Some(outcome)
    }
}

impl TaskRunner for FileTaskExecutor {
    fn run(&self, task: &Task) -> Option<TaskOutcome> {
        self.execute(task)
    }
}

fn apply(task: &Task) -> Result<Applied, TaskError> {
    match &task.operation {
        Operation::Scale { factor } => scale_image(&task.path, *factor),
        Operation::Negative => negate_image(&task.path),
        Operation::Remove => remove_image(&task.path),
        Operation::Copy { dest } => copy_image(&task.path, dest),
    }
}

fn scale_image(path: &Path, factor: f64) -> Result<Applied, TaskError> {
    let Some(original) = decode(path)? else {
        return Ok(Applied::DecodeSkip);
    };
    let scaled = scale(&original, factor).ok_or_else(|| TaskError::EmptyScale {
        path: path.to_path_buf(),
        width: original.width(),
        height: original.height(),
        factor,
    })?;
    let format = format_for_path(path);
    replace_via_temp(path, |temp| encode(&scaled, format, temp))?;
    info!(
        "Scaled {}x{} -> {}x{}: {}",
        original.width(),
        original.height(),
        scaled.width(),
        scaled.height(),
        path.display()
    );
    Ok(Applied::Done)
}

fn negate_image(path: &Path) -> Result<Applied, TaskError> {
    let Some(mut img) = decode(path)? else {
        return Ok(Applied::DecodeSkip);
    };
    negate(&mut img);
    let format = format_for_path(path);
    replace_via_temp(path, |temp| encode(&img, format, temp))?;
    info!("Negative created: {}", path.display());
    Ok(Applied::Done)
}

fn remove_image(path: &Path) -> Result<Applied, TaskError> {
    fs::remove_file(path).map_err(|e| TaskError::io(path, e))?;
    info!("Removed: {}", path.display());
    Ok(Applied::Done)
}

fn copy_image(path: &Path, dest: &Path) -> Result<Applied, TaskError> {
    fs::create_dir_all(dest).map_err(|e| TaskError::io(dest, e))?;
    let target = copy_target(path, dest).ok_or_else(|| {
        TaskError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    if is_same_file(path, &target) {
        // Copying a file onto itself would truncate it; the target already holds the content.
        debug!("Copy target is the source itself: {}", path.display());
    } else {
        fs::copy(path, &target).map_err(|e| TaskError::io(path, e))?;
    }
    info!("Copied: {} -> {}", path.display(), target.display());
    Ok(Applied::Done)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
