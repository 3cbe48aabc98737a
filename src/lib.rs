//! imgbatch: bulk, concurrent, in-place image transformation across a directory tree

pub mod cancel;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use cancel::CancelToken;
pub use error::{ArgumentError, TaskError};
pub use types::*;

use log::debug;
use std::path::Path;

/// Result alias used by public imgbatch API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: apply `opts.operation` to every image under `root` and return a [`RunResult`].
///
/// - Fails before doing anything when `opts` is invalid ([`ArgumentError`]) or `root` cannot be read.
/// - Per-file failures are logged and counted in the result, never returned.
/// - `cancel` may be set from any thread; the walk stops, queued tasks are dropped, and tasks
///   already running finish.
///
/// ```ignore
/// let opts = Opts { operation: Some(Operation::Negative), recursive: true, ..Default::default() };
/// let result = imgbatch::process_dir(Path::new("photos"), &opts, &CancelToken::new())?;
/// ```
pub fn process_dir(root: &Path, opts: &Opts, cancel: &CancelToken) -> Result<RunResult> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    pipeline::run(root, opts, cancel)
}
