//! Swap formatting, activation, and the active-swap query.

use crate::{command, Error, Result};
use std::path::Path;

const PROC_SWAPS: &str = "/proc/swaps";

/// Format `dev` as swap space.
pub fn mkswap(dev: &Path) -> Result<()> {
    let dev = dev.display().to_string();
    command::run("mkswap", &[dev.as_str()])
}

/// Activate `dev` as swap.
pub fn swapon(dev: &Path) -> Result<()> {
    let dev = dev.display().to_string();
    command::run("swapon", &[dev.as_str()])
}

/// Deactivate `dev` as swap. Deactivating a device that is not active
/// is itself an error, so callers check [`is_active`] first.
pub fn swapoff(dev: &Path) -> Result<()> {
    let dev = dev.display().to_string();
    command::run("swapoff", &[dev.as_str()])
}

/// Whether `dev` is currently listed as an active swap device.
pub fn is_active(dev: &Path) -> Result<bool> {
    let swaps = std::fs::read_to_string(PROC_SWAPS)
        .map_err(|e| Error::Io(format!("failed to read {PROC_SWAPS}: {e}")))?;
    Ok(lists_device(&swaps, dev))
}

/// The first column of each `/proc/swaps` entry names the swap device.
/// The header line is skipped and paths are compared whole, so
/// `/dev/zram1` never matches `/dev/zram10`.
fn lists_device(swaps: &str, dev: &Path) -> bool {
    let dev = dev.to_string_lossy();
    swaps
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .any(|field| field == dev.as_ref())
}
