//! Pipeline components: walk context, walker, worker pool, run coordinator, error reporting.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod pool;
pub mod walk;

pub use context::{WalkContext, WalkReport};
pub use error_handler::report_skipped_dirs;
pub use orchestrator::{run, run_with_runner};
pub use pool::{HandleState, ShutdownReport, TaskHandle, TaskRunner, WorkerPool};
pub use walk::{WalkOutcome, run_walk_loop, to_outcome_walkdir, walk};
