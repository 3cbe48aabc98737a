//! Typed errors. Fatal run errors travel as `anyhow::Error`; these name the cases callers match on.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid run configuration. Fatal: nothing is submitted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgumentError {
    #[error("no operation selected (use /s <factor>, /n, /r or /c <dir>)")]
    MissingOperation,

    #[error("scale factor must be a positive number, got {0}")]
    InvalidScaleFactor(f64),

    #[error("copy requires a destination directory")]
    MissingDestination,

    #[error("worker count must be at least 1")]
    ZeroWorkers,
}

/// Failure of a single task. Caught at the task boundary and reported, never propagated.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("scaling {path} ({width}x{height}) by {factor} leaves no pixels")]
    EmptyScale {
        path: PathBuf,
        width: u32,
        height: u32,
        factor: f64,
    },
}

impl TaskError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TaskError::Io {
            path: path.into(),
            source,
        }
    }
}
