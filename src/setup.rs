//! End-to-end provisioning flow.
//!
//! One invocation resolves the target size, loads the kernel modules,
//! reclaims whatever device a previous invocation of this same boot
//! left behind, then creates, configures, formats, and activates a
//! fresh device and records it for the next invocation.

use crate::device::ZramDevice;
use crate::state::StateStore;
use crate::{boot, command, mem, swap, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Resolved invocation inputs.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Location of the boot-scoped state record.
    pub state_file: PathBuf,
    /// Requested swap size in bytes; half of total memory when absent.
    pub max_size: Option<u64>,
    /// Compression algorithm, also the name of its kernel module.
    pub algorithm: String,
    /// Optional block device backing the zram device.
    pub backing_dev: Option<PathBuf>,
}

/// Provision the zram swap device described by `settings`.
pub fn provision(settings: &Settings) -> Result<()> {
    let size = target_size(settings)?;
    info!(size, algorithm = %settings.algorithm, "provisioning zram swap");

    info!("loading kernel modules");
    command::run("modprobe", &["zram", "num_devices=0"])?;
    command::run("modprobe", &[settings.algorithm.as_str()])?;

    let boot_id = boot::current_boot_id()?;
    let mut state = StateStore::open(&settings.state_file);
    reclaim_previous(&mut state, &boot_id)?;

    let device = ZramDevice::create()?;
    info!(device = %device.name(), "created device");

    match configure_and_activate(&device, settings, size) {
        Ok(()) => {
            state.record(&boot_id, device.number())?;
            info!(device = %device.name(), "zram swap active");
            Ok(())
        }
        Err(e) => {
            // Best effort; the original error is the one worth surfacing.
            warn!(device = %device.name(), error = %e, "configuration failed, removing device");
            let name = device.name();
            if let Err(cleanup) = device.remove() {
                warn!(device = %name, error = %cleanup, "failed to remove partially configured device");
            }
            Err(e)
        }
    }
}

/// Target device size in bytes: the requested maximum, defaulting to
/// half of total memory. A backing device overrides either with its
/// real geometry.
fn target_size(settings: &Settings) -> Result<u64> {
    let mut size = match settings.max_size {
        Some(bytes) => bytes,
        None => mem::total_memory_bytes()? / 2,
    };
    if let Some(backing) = &settings.backing_dev {
        size = mem::backing_device_size_bytes(backing)?;
    }
    Ok(size)
}

/// Tear down the device a prior invocation of this same boot recorded.
///
/// A record from a previous boot names a device that no longer exists
/// and is ignored, not acted upon.
fn reclaim_previous(state: &mut StateStore, boot_id: &str) -> Result<()> {
    let Some(prior) = state.prior() else {
        return Ok(());
    };
    if prior.boot_id != boot_id {
        info!("state file is from a previous boot, ignoring");
        return Ok(());
    }
    let device = ZramDevice::open(prior.device_number);
    info!(device = %device.name(), "removing device from an earlier run this boot");
    let dev_path = device.dev_path();
    if swap::is_active(&dev_path)? {
        swap::swapoff(&dev_path)?;
    }
    device.remove()?;
    state.clear()
}

/// The steps that need compensation when they fail: everything between
/// device creation and swap activation.
fn configure_and_activate(device: &ZramDevice, settings: &Settings, size: u64) -> Result<()> {
    if let Some(backing) = &settings.backing_dev {
        // The kernel only accepts a disksize for a backed device once
        // backing_dev is set.
        device.set_backing_dev(backing)?;
    }
    device.set_comp_algorithm(&settings.algorithm)?;
    device.set_disk_size(size)?;
    device.set_mem_limit(size)?;

    let dev_path = device.dev_path();
    info!(device = %device.name(), "formatting and activating swap");
    swap::mkswap(&dev_path)?;
    swap::swapon(&dev_path)
}
