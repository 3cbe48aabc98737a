//! Directory Walker: lists the tree, submits one task per image file, never waits on tasks.

use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::cancel::CancelToken;
use crate::engine::tools::{is_image_file, should_include_in_walk};
use crate::pipeline::pool::WorkerPool;

use super::context::{WalkContext, WalkReport};

/// One result from a directory walk: a directory, a file to consider, or an enumeration error.
pub enum WalkOutcome {
    Dir(PathBuf),
    File(PathBuf),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_dir() => WalkOutcome::Dir(entry.into_path()),
        Ok(entry) => WalkOutcome::File(entry.into_path()),
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Lazy iterator over the context's tree in filesystem order. Shallow when `recursive` is off.
/// Filtered sub-directories are pruned, not just skipped.
fn walkdir_iter(ctx: &WalkContext) -> impl Iterator<Item = WalkOutcome> + '_ {
    let max_depth = if ctx.recursive { usize::MAX } else { 1 };
    WalkDir::new(&ctx.root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(ctx.follow_links)
        .into_iter()
        .filter_entry(move |e| {
            e.depth() == 0
                || should_include_in_walk(e.path(), &ctx.root, &ctx.excluded_dir, &ctx.exclude)
        })
        .map(to_outcome_walkdir)
}

/// Walk `ctx.root` and submit a task to `pool` for every image file found.
///
/// Cancellation is checked before each entry; once set, the remaining entries are left alone.
/// An unreadable directory is recorded in `skipped_dirs` and its subtree skipped; siblings go on.
pub fn walk(ctx: &WalkContext, pool: &WorkerPool, cancel: &CancelToken) -> WalkReport {
    run_walk_loop(ctx, walkdir_iter(ctx), pool, cancel)
}

/// Run the common walk loop over `iter`: submit image files, record errors, stop on cancellation.
pub fn run_walk_loop<I>(
    ctx: &WalkContext,
    iter: I,
    pool: &WorkerPool,
    cancel: &CancelToken,
) -> WalkReport
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut report = WalkReport::default();
    for outcome in iter {
        if cancel.is_cancelled() {
            debug!("Walk stopped by cancellation");
            report.cancelled = true;
            break;
        }
        match outcome {
            // walkdir descends on its own (or not, when shallow)
            WalkOutcome::Dir(_) => {}
            WalkOutcome::File(path) => {
                // is_file follows symlinks, so a link to an image counts; a link to a directory does not.
                if is_image_file(&path) && path.is_file() {
                    report.handles.push(pool.submit(ctx.task_for(path)));
                }
            }
            WalkOutcome::Err { msg, path } => {
                warn!("Error reading directory: {}", msg);
                let path = path.unwrap_or_else(|| ctx.root.clone());
                report.skipped_dirs.push((path, msg));
            }
        }
    }
    if !report.cancelled && cancel.is_cancelled() {
        report.cancelled = true;
    }
    debug!("Walk submitted {} task(s)", report.handles.len());
    report
}
