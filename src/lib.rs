//! Tsh - Tiny Shell
//!
//! Reads a line, splits it into a pipeline of external programs, wires up
//! redirections and pipes, and runs the pipeline to completion.

#![recursion_limit = "1024"]

#[macro_use]
extern crate error_chain;

/// Logs `$result` at error level if it is an `Err`, discarding the error.
#[macro_export]
macro_rules! log_if_err {
    ($result:expr, $fmt:expr) => {{
        if let Err(e) = $result {
            ::log::error!("{}: {}", $fmt, e);
        }
    }};
}

mod builtins;
pub mod core;
mod editor;
pub mod errors;
pub mod execute_command;
pub mod shell;
mod util;

pub use crate::shell::{Shell, ShellConfig};
pub use crate::util::{isatty, TshExitStatusExt};
