use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter, Record};
use std::io::Write;
use std::thread;

/// Render one record. Info is the per-file console line; debug carries the emitting thread,
/// since workers log concurrently; warnings and errors name their module.
fn format_line(record: &Record<'_>) -> String {
    let name = env!("CARGO_PKG_NAME").cyan();
    match record.level() {
        Level::Error | Level::Warn => {
            let level_str = if record.level() == Level::Warn {
                "WARN".yellow()
            } else {
                "ERROR".red()
            };
            let path = record.target().white();
            format!("[{} {} {}] {}", name, level_str, path, record.args())
        }
        Level::Info => format!("[{}] {}", name, record.args()),
        Level::Debug | Level::Trace => {
            let current = thread::current();
            let who = current.name().unwrap_or("worker");
            format!("[{} {}] {}", name, who.dimmed(), record.args().to_string().dimmed())
        }
    }
}

/// Install the console logger: dependencies at warn, this crate at info (debug when `verbose`).
/// `RUST_LOG` still applies. Later calls are ignored.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_CRATE_NAME"), level)
        .format(|buf, record| writeln!(buf, "{}", format_line(record)))
        .try_init();
}
