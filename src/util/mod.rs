use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

pub use self::unix::isatty;

pub mod unix;

/// Tsh Utility Extensions for `ExitStatus`
pub trait TshExitStatusExt {
    /// Create an ExitStatus to indicate *successful* program execution.
    fn from_success() -> Self;

    /// Create an ExitStatus from a status code
    fn from_status(code: i32) -> Self;
}

impl TshExitStatusExt for ExitStatus {
    /// # Examples
    /// ```rust
    /// use std::process::ExitStatus;
    /// use tsh::TshExitStatusExt;
    /// assert!(ExitStatus::from_success().success());
    /// ```
    fn from_success() -> Self {
        ExitStatus::from_status(0)
    }

    fn from_status(code: i32) -> Self {
        ExitStatus::from_raw((code & 0xff) << 8)
    }
}
