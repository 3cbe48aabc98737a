//! imgbatch CLI: transform every image under a directory; Esc or Ctrl+C cancels.

use anyhow::Result;
use imgbatch::engine::arg_parser::Cli;
use imgbatch::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse_with_legacy_flags();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
