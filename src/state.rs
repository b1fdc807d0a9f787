//! Boot-scoped persisted state.
//!
//! One small TOML record survives process exit but lives under `/run`,
//! so it is scoped to a single boot. Every mutation rewrites the file
//! atomically (write-temp-then-rename), so a crash can never leave a
//! partial record behind.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// On-disk record. Absence of either key means "no prior run".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    boot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_number: Option<u32>,
}

/// A fully recorded prior run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorRun {
    /// Boot the device was provisioned in.
    pub boot_id: String,
    /// Device number that was active as swap.
    pub device_number: u32,
}

/// Handle to the state file for the duration of one run.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    record: Record,
}

impl StateStore {
    /// Open the store at `path`, loading the existing record if any.
    ///
    /// A missing file is an empty record. An unreadable or unparseable
    /// file is demoted to an empty record with a warning: the record is
    /// rewritten atomically on tmpfs, so a bad one means outside
    /// interference, and refusing to provision swap at boot over it
    /// would be the worse outcome.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(record) => record,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring unparseable state file");
                    Record::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Record::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable state file");
                Record::default()
            }
        };
        Self { path, record }
    }

    /// The prior run recorded here, if both keys are present.
    #[must_use]
    pub fn prior(&self) -> Option<PriorRun> {
        Some(PriorRun {
            boot_id: self.record.boot_id.clone()?,
            device_number: self.record.device_number?,
        })
    }

    /// Record a fully provisioned device and persist.
    pub fn record(&mut self, boot_id: &str, device_number: u32) -> Result<()> {
        self.record.boot_id = Some(boot_id.to_string());
        self.record.device_number = Some(device_number);
        self.persist()
    }

    /// Remove both keys and persist.
    pub fn clear(&mut self) -> Result<()> {
        self.record = Record::default();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let content = toml::to_string(&self.record)
            .map_err(|e| Error::Format(format!("failed to serialize state: {e}")))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Io(format!("failed to create {}: {e}", parent.display())))?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, content)
            .map_err(|e| Error::Io(format!("failed to write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            Error::Io(format!(
                "failed to rename {} to {}: {e}",
                tmp.display(),
                self.path.display()
            ))
        })
    }
}
