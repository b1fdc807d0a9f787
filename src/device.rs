//! Zram device lifecycle.
//!
//! A [`ZramDevice`] value exists only while the kernel has the device
//! number allocated: [`ZramDevice::create`] and [`ZramDevice::open`]
//! produce one, [`ZramDevice::remove`] consumes it. Attribute accessors
//! therefore cannot be reached for a device that no longer exists.
//!
//! Number allocation (`/sys/class/zram-control`) and attribute
//! configuration (`/sys/block/zram<N>`) are separate kernel interfaces
//! with separate failure modes; only deallocation can race with
//! in-flight I/O, which is why [`ZramDevice::remove`] retries.

use crate::retry::retry;
use crate::{sysfs, Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONTROL_DIR: &str = "/sys/class/zram-control";

/// Attempts made to deallocate a device before giving up.
const REMOVE_ATTEMPTS: u32 = 10;
/// Delay between deallocation attempts.
const REMOVE_DELAY: Duration = Duration::from_secs(1);

/// Handle to an allocated zram block device.
#[derive(Debug)]
pub struct ZramDevice {
    number: u32,
}

impl ZramDevice {
    /// Allocate the next free device number from the kernel.
    ///
    /// Reading `hot_add` allocates a device as a side effect and
    /// returns its number. Fails if the zram module is not loaded.
    pub fn create() -> Result<Self> {
        let path = format!("{CONTROL_DIR}/hot_add");
        if !Path::new(&path).exists() {
            return Err(Error::Io(
                "zram-control not available, is the zram module loaded?".to_string(),
            ));
        }
        let number = sysfs::read_value(&path)?;
        Ok(Self { number })
    }

    /// Bind to an already-allocated device by number.
    ///
    /// The kernel-side attribute state is whatever a prior run left
    /// behind.
    #[must_use]
    pub fn open(number: u32) -> Self {
        Self { number }
    }

    /// Kernel device number.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Device name, e.g. `zram0`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("zram{}", self.number)
    }

    /// Sysfs directory for this device.
    #[must_use]
    pub fn sys_path(&self) -> PathBuf {
        PathBuf::from(format!("/sys/block/zram{}", self.number))
    }

    /// Device node path, e.g. `/dev/zram0`.
    #[must_use]
    pub fn dev_path(&self) -> PathBuf {
        PathBuf::from(format!("/dev/zram{}", self.number))
    }

    /// Whether the kernel still exposes this device.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.sys_path().exists()
    }

    /// Deallocate the device number back to the kernel.
    ///
    /// A device whose sysfs directory is already gone counts as
    /// removed. Deallocation can fail transiently while the kernel is
    /// still releasing in-flight I/O on the device, so the write is
    /// retried with a fixed delay; after the final attempt the last
    /// error is returned.
    pub fn remove(self) -> Result<()> {
        if !self.exists() {
            return Ok(());
        }
        retry(
            REMOVE_ATTEMPTS,
            REMOVE_DELAY,
            |e| matches!(e, Error::Io(_)),
            || sysfs::write_value(format!("{CONTROL_DIR}/hot_remove"), self.number),
        )
    }

    /// Clear the device's configuration while keeping its number
    /// allocated.
    pub fn reset(&self) -> Result<()> {
        sysfs::write_value(self.attr_path("reset"), self.number)
    }

    fn attr_path(&self, attr: &str) -> PathBuf {
        self.sys_path().join(attr)
    }

    /// Configured disk size in bytes.
    pub fn disk_size(&self) -> Result<u64> {
        sysfs::read_value(self.attr_path("disksize"))
    }

    /// Set the disk size. Writing it activates the device, so it must
    /// come after the compression algorithm and, for backed devices,
    /// after [`set_backing_dev`](Self::set_backing_dev).
    pub fn set_disk_size(&self, bytes: u64) -> Result<()> {
        sysfs::write_value(self.attr_path("disksize"), bytes)
    }

    /// Memory usage limit in bytes.
    pub fn mem_limit(&self) -> Result<u64> {
        sysfs::read_value(self.attr_path("mem_limit"))
    }

    /// Cap the memory the compressed pool may use.
    pub fn set_mem_limit(&self, bytes: u64) -> Result<()> {
        sysfs::write_value(self.attr_path("mem_limit"), bytes)
    }

    /// Selected compression algorithm.
    pub fn comp_algorithm(&self) -> Result<String> {
        sysfs::read_string(self.attr_path("comp_algorithm"))
    }

    /// Select the compression algorithm. Must happen before the disk
    /// size is set.
    pub fn set_comp_algorithm(&self, algorithm: &str) -> Result<()> {
        sysfs::write_value(self.attr_path("comp_algorithm"), algorithm)
    }

    /// Backing block device, if one is configured. The kernel reports
    /// `none` for an unbacked device.
    pub fn backing_dev(&self) -> Result<Option<PathBuf>> {
        let value = sysfs::read_string(self.attr_path("backing_dev"))?;
        Ok((value != "none").then(|| PathBuf::from(value)))
    }

    /// Route the device's storage to a backing block device. Must
    /// happen before the disk size is set.
    pub fn set_backing_dev(&self, dev: &Path) -> Result<()> {
        sysfs::write_value(self.attr_path("backing_dev"), dev.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // High enough that no real system has it allocated.
    const NONEXISTENT_DEVICE: u32 = u32::MAX;

    #[test]
    fn test_device_paths() {
        let dev = ZramDevice::open(5);
        assert_eq!(dev.number(), 5);
        assert_eq!(dev.name(), "zram5");
        assert_eq!(dev.sys_path(), PathBuf::from("/sys/block/zram5"));
        assert_eq!(dev.dev_path(), PathBuf::from("/dev/zram5"));
    }

    #[test]
    fn test_nonexistent_device_exists() {
        let dev = ZramDevice::open(NONEXISTENT_DEVICE);
        assert!(!dev.exists());
    }

    #[test]
    fn test_remove_nonexistent_is_noop() {
        let dev = ZramDevice::open(NONEXISTENT_DEVICE);
        assert!(dev.remove().is_ok());
    }

    #[test]
    fn test_read_attr_nonexistent() {
        let dev = ZramDevice::open(NONEXISTENT_DEVICE);
        let result = dev.disk_size();
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_read_algorithm_nonexistent() {
        let dev = ZramDevice::open(NONEXISTENT_DEVICE);
        assert!(dev.comp_algorithm().is_err());
    }

    #[test]
    fn test_write_attr_nonexistent() {
        let dev = ZramDevice::open(NONEXISTENT_DEVICE);
        let result = dev.set_disk_size(4 * 1024 * 1024);
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_reset_nonexistent() {
        let dev = ZramDevice::open(NONEXISTENT_DEVICE);
        assert!(dev.reset().is_err());
    }

    #[test]
    fn test_backing_dev_nonexistent() {
        let dev = ZramDevice::open(NONEXISTENT_DEVICE);
        assert!(dev.backing_dev().is_err());
    }

    #[test]
    fn test_device_debug() {
        let dev = ZramDevice::open(0);
        let debug = format!("{dev:?}");
        assert!(debug.contains("ZramDevice"));
    }
}
