//! Boot identity.

use crate::{Error, Result};

const BOOT_ID_PATH: &str = "/proc/sys/kernel/random/boot_id";

/// The kernel's unique token for the current boot.
///
/// Opaque, only ever compared for equality. Unavailability is fatal
/// upstream: without it, same-boot state cannot be told apart from
/// stale state.
pub fn current_boot_id() -> Result<String> {
    let content = std::fs::read_to_string(BOOT_ID_PATH)
        .map_err(|e| Error::Io(format!("failed to read {BOOT_ID_PATH}: {e}")))?;
    Ok(content.lines().next().unwrap_or("").trim().to_string())
}
