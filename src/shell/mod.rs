//! Tsh - Shell Module
//!
//! The read-eval loop. Each line becomes at most one Job, which lives for a
//! single iteration of the loop.

pub use self::shell::Shell;

mod shell;

/// Policy object to control a Shell's behavior
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShellConfig {
    /// Determines if new command entries will be added to the line editor's history.
    ///
    /// Note: This is checked before the other command history config fields.
    enable_command_history: bool,

    /// Number of entries to keep in the line editor's history
    command_history_capacity: usize,

    /// Determines if the banner, the prompt and the "exit" message are displayed.
    display_messages: bool,

    /// Determines if the shell ignores SIGINT. Children always restore the
    /// default disposition.
    ignore_interrupts: bool,
}

impl ShellConfig {
    /// Creates an interactive shell
    ///
    /// # Complete List
    /// - Command History is enabled (in memory only)
    /// - The banner, the prompt and some additional messages are displayed
    /// - Ctrl-C interrupts the running pipeline, not the shell
    pub fn interactive(command_history_capacity: usize) -> Self {
        Self {
            enable_command_history: true,
            command_history_capacity,
            display_messages: true,
            ignore_interrupts: true,
        }
    }

    /// Creates a noninteractive shell, e.g. for `-c` or a script file
    ///
    /// # Complete List
    /// - Command History is disabled
    /// - No banner, prompt or messages are displayed
    /// - SIGINT keeps its default disposition
    pub fn noninteractive() -> Self {
        Default::default()
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            enable_command_history: false,
            command_history_capacity: 0,
            display_messages: false,
            ignore_interrupts: false,
        }
    }
}
