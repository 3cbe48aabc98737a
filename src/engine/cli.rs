//! CLI command handler: layer settings, install cancellation, run, report.

use anyhow::Result;
use log::{debug, info, warn};

use crate::cancel::{CancelToken, install_cancel_listeners};
use crate::engine::arg_parser::Cli;
use crate::utils::setup_logging;
use crate::utils::settings_toml::{apply_settings_to_opts, load_settings_toml};
use crate::{Opts, RunResult, process_dir};

/// Build opts from defaults, then `.imgbatch.toml` in the source directory, then CLI flags.
fn setup_opts(cli: &Cli) -> Opts {
    let file = load_settings_toml(&cli.dir);
    let mut opts = Opts::default();
    if let Ok(Some(file)) = &file {
        apply_settings_to_opts(file, &mut opts);
    }
    opts.operation = cli.operation();
    if let Some(v) = cli.sub {
        opts.recursive = v;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if let Some(v) = cli.dry_run {
        opts.dry_run = v;
    }
    if let Some(v) = cli.follow_links {
        opts.follow_links = v;
    }
    if !cli.exclude.is_empty() {
        opts.exclude.extend(cli.exclude.iter().cloned());
    }
    if cli.workers.is_some() {
        opts.num_threads = cli.workers;
    }

    setup_logging(opts.verbose);
    if let Err(e) = &file {
        warn!("{:#}; ignoring it", e);
    }
    opts
}

/// Run the selected operation over `cli.dir`. Argument errors return before anything runs.
/// "Processing complete" is printed whenever the run started, however it ended.
pub fn handle_run(cli: &Cli) -> Result<RunResult> {
    let opts = setup_opts(cli);
    opts.validate()?;

    let cancel = CancelToken::new();
    install_cancel_listeners(&cancel)?;
    if opts.dry_run {
        warn!("RUNNING IN DRY-RUN MODE. NO FILES WILL BE CHANGED.");
    }
    info!("Processing started. Press Esc (then Enter) or Ctrl+C to cancel.");

    let result = process_dir(&cli.dir, &opts, &cancel);
    if let Ok(r) = &result {
        if r.cancelled {
            info!("Cancelled; pending work was discarded");
        }
        debug!(
            "{} submitted, {} completed, {} failed, {} not run",
            r.tasks_submitted, r.tasks_completed, r.tasks_failed, r.tasks_discarded
        );
    }
    info!("Processing complete");
    result
}
