//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    settings_filename: String,
    temp_suffix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                settings_filename: format!(".{pkg}.toml"),
                temp_suffix: format!(".{pkg}.tmp"),
            }
        })
    }

    /// Per-directory settings file, e.g. `.imgbatch.toml`.
    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }

    /// Suffix for the sibling file an overwrite is staged in, e.g. `.imgbatch.tmp`.
    pub fn temp_suffix(&self) -> &str {
        &self.temp_suffix
    }
}

// ---- Worker threads ----

/// Thread limits for the worker pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available hardware threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
}

impl WorkerThreadLimits {
    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
        }
    }
}

// ---- Files ----

/// Extensions (lowercase, without dot) a file must end with to become a task.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

// ---- Shutdown / polling ----

/// Max graceful wait for queued and in-flight tasks once the walk is done. Past it, work is abandoned.
pub const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// How often the coordinator and the keypress listener look at the cancellation flag.
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Byte that cancels the run when read from stdin.
pub const ESC_KEY: u8 = 27;
