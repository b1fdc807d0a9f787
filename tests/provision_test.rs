//! End-to-end provisioning tests.
//!
//! These drive the real kernel zram driver, so they need root and the
//! zram module and are ignored by default. Each test probes for
//! availability and bails politely when the environment cannot run it.

use std::path::{Path, PathBuf};
use zram_swap::device::ZramDevice;
use zram_swap::setup::{provision, Settings};
use zram_swap::state::StateStore;
use zram_swap::swap;

fn zram_available() -> bool {
    Path::new("/sys/class/zram-control").exists() || Path::new("/sys/block/zram0").exists()
}

fn small_settings(state_file: PathBuf) -> Settings {
    Settings {
        state_file,
        max_size: Some(16 * 1024 * 1024),
        algorithm: "lz4".to_string(),
        backing_dev: None,
    }
}

fn teardown(state_file: &Path) {
    let mut state = StateStore::open(state_file);
    if let Some(prior) = state.prior() {
        let device = ZramDevice::open(prior.device_number);
        let dev_path = device.dev_path();
        if swap::is_active(&dev_path).unwrap_or(false) {
            let _ = swap::swapoff(&dev_path);
        }
        let _ = device.remove();
        let _ = state.clear();
    }
}

#[test]
#[ignore = "requires root and zram module"]
fn test_provision_fresh() {
    if !zram_available() {
        println!("Skipping: zram not available");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let settings = small_settings(dir.path().join("zram-swap.state"));

    provision(&settings).unwrap();

    let state = StateStore::open(&settings.state_file);
    let prior = state.prior().expect("state recorded after provisioning");

    let device = ZramDevice::open(prior.device_number);
    assert!(device.exists());
    assert_eq!(device.disk_size().unwrap(), 16 * 1024 * 1024);
    assert!(swap::is_active(&device.dev_path()).unwrap());

    teardown(&settings.state_file);
}

#[test]
#[ignore = "requires root and zram module"]
fn test_reprovision_same_boot_leaves_one_device() {
    if !zram_available() {
        println!("Skipping: zram not available");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let settings = small_settings(dir.path().join("zram-swap.state"));

    provision(&settings).unwrap();
    let first = StateStore::open(&settings.state_file).prior().unwrap();

    // The second run must replace the first device, never accumulate.
    provision(&settings).unwrap();
    let second = StateStore::open(&settings.state_file).prior().unwrap();
    assert_eq!(first.boot_id, second.boot_id);

    let first_device = ZramDevice::open(first.device_number);
    let second_device = ZramDevice::open(second.device_number);
    assert!(second_device.exists());
    assert!(swap::is_active(&second_device.dev_path()).unwrap());
    if first.device_number != second.device_number {
        assert!(!swap::is_active(&first_device.dev_path()).unwrap());
    }

    teardown(&settings.state_file);
}
