//! Invocation of external privileged helpers.
//!
//! Callers only care about success or failure; stdio is inherited so
//! the helpers' own diagnostics reach the console.

use crate::{Error, Result};
use std::process::Command;

/// Run `program` with `args`, waiting for completion.
///
/// Fails if the program exits nonzero or cannot be located.
pub fn run(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| Error::Command(format!("failed to run {program}: {e}")))?;
    if status.success() {
        Ok(())
    } else {
        let cmdline = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        Err(Error::Command(format!("{cmdline} exited with {status}")))
    }
}
