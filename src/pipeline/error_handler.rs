use std::path::PathBuf;

use crate::Opts;

/// Log the directories the walk had to skip. Enumeration errors never fail the run.
/// Call after the walk.
pub fn report_skipped_dirs(opts: &Opts, skipped_dirs: &[(PathBuf, String)]) {
    if skipped_dirs.is_empty() {
        return;
    }
    log::warn!(
        "Skipped {} directories due to permission errors or access issues",
        skipped_dirs.len()
    );
    if opts.verbose {
        for (p, msg) in skipped_dirs {
            eprintln!("  skipped: {} ({})", p.display(), msg);
        }
    }
}
