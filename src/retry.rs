//! Fixed-count, fixed-delay retry for transiently failing operations.

use crate::{Error, Result};
use std::thread;
use std::time::Duration;

/// Run `op` up to `attempts` times, sleeping `delay` between tries.
///
/// Only errors for which `retryable` returns true are retried; any
/// other error, and the error of the final attempt, are returned as-is.
/// `op` always runs at least once.
pub fn retry<T>(
    attempts: u32,
    delay: Duration,
    retryable: impl Fn(&Error) -> bool,
    mut op: impl FnMut() -> Result<T>,
) -> Result<T> {
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts && retryable(&e) => {
                tracing::debug!(attempt, error = %e, "retrying after transient failure");
                thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
