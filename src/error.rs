//! Error types for zram-swap.

use thiserror::Error;

/// Errors that can occur while provisioning a zram swap device.
#[derive(Debug, Error)]
pub enum Error {
    /// A kernel interface or file is missing, unreadable, or unwritable.
    #[error("I/O error: {0}")]
    Io(String),

    /// A kernel-exposed scalar could not be parsed.
    #[error("invalid value: {0}")]
    Format(String),

    /// An external program exited nonzero or could not be started.
    #[error("command error: {0}")]
    Command(String),

    /// Total system memory could not be determined.
    #[error("memory estimation error: {0}")]
    Estimation(String),
}

/// Result type for zram-swap operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let err = Error::Io("failed to read /sys/class/zram-control/hot_add".to_string());
        assert!(err.to_string().contains("I/O error"));
        assert!(err.to_string().contains("hot_add"));
    }

    #[test]
    fn test_error_display_format() {
        let err = Error::Format("invalid value in /sys/block/zram0/disksize".to_string());
        assert!(err.to_string().contains("invalid value"));
    }

    #[test]
    fn test_error_display_command() {
        let err = Error::Command("mkswap exited with exit status: 1".to_string());
        assert!(err.to_string().contains("command error"));
        assert!(err.to_string().contains("mkswap"));
    }

    #[test]
    fn test_error_display_estimation() {
        let err = Error::Estimation("no MemTotal line in /proc/meminfo".to_string());
        assert!(err.to_string().contains("memory estimation error"));
    }

    #[test]
    fn test_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<Error>();
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
