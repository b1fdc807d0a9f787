//! Swap sizing from system memory or backing-device geometry.

use crate::{sysfs, Error, Result};
use std::path::Path;

const MEMINFO_PATH: &str = "/proc/meminfo";

/// Total system memory in bytes, from `/proc/meminfo`.
pub fn total_memory_bytes() -> Result<u64> {
    let meminfo = std::fs::read_to_string(MEMINFO_PATH)
        .map_err(|e| Error::Io(format!("failed to read {MEMINFO_PATH}: {e}")))?;
    parse_mem_total(&meminfo)
}

/// Locate the `MemTotal:` line and convert its `<number> <unit>` pair
/// to bytes.
fn parse_mem_total(meminfo: &str) -> Result<u64> {
    for line in meminfo.lines() {
        let Some(rest) = line.strip_prefix("MemTotal:") else {
            continue;
        };
        let mut fields = rest.split_whitespace();
        let number: u64 = fields
            .next()
            .ok_or_else(|| Error::Estimation(format!("no value in {line:?}")))?
            .parse()
            .map_err(|_| Error::Estimation(format!("unparseable value in {line:?}")))?;
        let unit = fields
            .next()
            .ok_or_else(|| Error::Estimation(format!("no unit in {line:?}")))?;
        return Ok(number * unit_multiplier(unit)?);
    }
    Err(Error::Estimation(format!(
        "no MemTotal line in {MEMINFO_PATH}"
    )))
}

/// Multiplier for a meminfo unit token (`B`, `kB`, `mB`, ...), each
/// letter one more power of 1024. An unrecognized letter is an error,
/// never a silent default.
fn unit_multiplier(unit: &str) -> Result<u64> {
    let exponent = match unit.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('b') => 0,
        Some('k') => 1,
        Some('m') => 2,
        Some('g') => 3,
        Some('t') => 4,
        Some('p') => 5,
        _ => {
            return Err(Error::Estimation(format!(
                "unrecognized memory unit {unit:?}"
            )))
        }
    };
    Ok(1024u64.pow(exponent))
}

/// Byte size of the block device at `path`, from its sector geometry.
///
/// Resolves symlinks first so `/dev/disk/by-*` style paths work, then
/// multiplies the sector count by the hardware sector size from the
/// device's attributes under `/sys/class/block`.
pub fn backing_device_size_bytes(path: &Path) -> Result<u64> {
    let real = std::fs::canonicalize(path)
        .map_err(|e| Error::Io(format!("failed to resolve {}: {e}", path.display())))?;
    let name = real
        .strip_prefix("/dev")
        .map_err(|_| Error::Io(format!("{} is not a device under /dev", real.display())))?
        .to_string_lossy()
        .into_owned();
    let sectors: u64 = sysfs::read_value(format!("/sys/class/block/{name}/size"))?;
    let sector_size: u64 = sysfs::read_value(format!("/sys/class/block/{name}/queue/hw_sector_size"))?;
    Ok(sectors * sector_size)
}
