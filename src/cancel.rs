//! Cooperative cancellation: a shared one-way flag plus the listeners that set it.

use anyhow::{Context, Result};
use log::{info, warn};
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::utils::config::{ESC_KEY, WAIT_POLL_INTERVAL};

/// Shared cancellation flag. Starts unset; once set it stays set for the life of the token.
///
/// Clones share the flag, so hand one to each component (walker, pool, executor) instead of a global.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Install process-wide cancellation triggers for `token`: Ctrl+C, and Esc read from stdin.
///
/// The stdin listener is a detached thread; it does not keep the process alive and exits on EOF,
/// on a read error, or once the token is cancelled. On a line-buffered terminal Esc is seen after Enter.
/// Ctrl+C can only be installed once per process.
pub fn install_cancel_listeners(token: &CancelToken) -> Result<()> {
    let ctrlc_token = token.clone();
    ctrlc::set_handler(move || {
        if !ctrlc_token.is_cancelled() {
            warn!("Cancelling...");
        }
        ctrlc_token.cancel();
    })
    .context("set Ctrl+C handler")?;

    let key_token = token.clone();
    thread::Builder::new()
        .name("cancel-listener".into())
        .spawn(move || listen_for_escape(std::io::stdin().lock(), &key_token))
        .context("spawn cancel listener")?;
    Ok(())
}

/// Read bytes from `input` until Esc (cancel), EOF, an error, or the token is already cancelled.
/// Returns true if this listener is the one that cancelled.
pub fn listen_for_escape<R: Read>(mut input: R, token: &CancelToken) -> bool {
    let mut buf = [0u8; 64];
    while !token.is_cancelled() {
        match input.read(&mut buf) {
            Ok(0) => return false,
            Ok(n) => {
                if buf[..n].contains(&ESC_KEY) {
                    info!("Cancelling...");
                    token.cancel();
                    return true;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                thread::sleep(WAIT_POLL_INTERVAL);
            }
            Err(_) => return false,
        }
    }
    false
}
