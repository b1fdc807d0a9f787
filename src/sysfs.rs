//! Scalar reads and writes over kernel pseudo-files.
//!
//! Sysfs and procfs attributes are single short values with a trailing
//! newline; these helpers read them whole and strip the whitespace.
//! There is no retry at this layer.

use crate::{Error, Result};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// Read a pseudo-file as a whitespace-trimmed string.
pub fn read_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Io(format!("failed to read {}: {e}", path.display())))?;
    Ok(content.trim().to_string())
}

/// Read a pseudo-file and parse its trimmed content as `T`.
pub fn read_value<T: FromStr>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = read_string(path)?;
    content
        .parse()
        .map_err(|_| Error::Format(format!("invalid value in {}: {content:?}", path.display())))
}

/// Write `value` followed by a newline to a pseudo-file.
pub fn write_value(path: impl AsRef<Path>, value: impl Display) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, format!("{value}\n"))
        .map_err(|e| Error::Io(format!("failed to write {}: {e}", path.display())))
}
